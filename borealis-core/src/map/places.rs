//! Reference place labels for the circumpolar view.
//!
//! The polar projection draws no base map, so a small fixed set of northern
//! settlements is labeled directly to give the viewer bearings.

use super::geo::LatLng;

/// A labeled reference location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Place {
    /// Display name of the settlement.
    pub name: &'static str,
    /// Label anchor.
    pub location: LatLng,
}

const fn place(name: &'static str, lat: f64, lng: f64) -> Place {
    Place {
        name,
        location: LatLng::new(lat, lng),
    }
}

/// Settlements labeled on every polar map.
pub const CIRCUMPOLAR_PLACES: &[Place] = &[
    place("Utqiaġvik", 71.29, -156.79),
    place("Nome", 64.50, -165.41),
    place("Fairbanks", 64.84, -147.72),
    place("Anchorage", 61.22, -149.90),
    place("Whitehorse", 60.72, -135.06),
    place("Yellowknife", 62.45, -114.37),
    place("Iqaluit", 63.75, -68.51),
    place("Nuuk", 64.18, -51.72),
    place("Reykjavík", 64.15, -21.94),
    place("Tromsø", 69.65, 18.96),
    place("Murmansk", 68.97, 33.07),
    place("Yakutsk", 62.03, 129.73),
];
