//! Geographic primitives shared by viewports, layers, and places.

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair, latitude first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
}

impl LatLng {
    /// Creates a coordinate pair.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A rectangular extent given by its south-west and north-east corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    /// South-west corner.
    pub south_west: LatLng,
    /// North-east corner.
    pub north_east: LatLng,
}

impl LatLngBounds {
    /// Creates bounds from the two corners.
    #[must_use]
    pub const fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Creates bounds from a `[west, south, east, north]` box, the order
    /// layer bounding boxes are declared in.
    #[must_use]
    pub const fn from_wsen(bbox: [f64; 4]) -> Self {
        Self {
            south_west: LatLng::new(bbox[1], bbox[0]),
            north_east: LatLng::new(bbox[3], bbox[2]),
        }
    }
}
