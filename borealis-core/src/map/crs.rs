//! The two projections the atlas renders in, with their full viewport
//! parameters.
//!
//! Both are custom projections a stock web-mercator map cannot display, so
//! every viewport ships its own proj4 definition and resolution ladder.

use serde::{Deserialize, Serialize};

use super::geo::{LatLng, LatLngBounds};
use super::renderer::ControlCorner;

/// EPSG:3572, WGS84 / North Pole LAEA Alaska.
const EPSG_3572_PROJ4: &str =
    "+proj=laea +lat_0=90 +lon_0=-150 +x_0=0 +y_0=0 +datum=WGS84 +units=m +no_defs";
const EPSG_3572_RESOLUTIONS: &[f64] = &[12288.0, 6144.0, 3072.0, 1536.0, 768.0];
const EPSG_3572_ORIGIN: (f64, f64) = (-4_889_334.802955, -4_889_334.802955);

/// EPSG:3338, NAD83 / Alaska Albers.
const EPSG_3338_PROJ4: &str = "+proj=aea +lat_1=55 +lat_2=65 +lat_0=50 +lon_0=-154 +x_0=0 +y_0=0 \
     +ellps=GRS80 +datum=NAD83 +units=m +no_defs";
const EPSG_3338_RESOLUTIONS: &[f64] =
    &[4096.0, 2048.0, 1024.0, 512.0, 256.0, 128.0, 64.0];
const EPSG_3338_ORIGIN: (f64, f64) = (-4_648_005.934_316_417, 444_809.882_955_059);

/// The base raster drawn under every regional map.
const ALASKA_BASE_LAYER: &str = "atlas_mapproxy:alaska_osm_retina";

/// Which projection a map instance renders in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Crs {
    /// Circumpolar view, EPSG:3572 (North Pole LAEA Alaska).
    Polar,
    /// Alaska-centric view, EPSG:3338 (Alaska Albers).
    Regional,
}

impl Crs {
    /// The EPSG code string, e.g. `EPSG:3572`.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Polar => "EPSG:3572",
            Self::Regional => "EPSG:3338",
        }
    }

    /// The base raster layer for this projection, if it has one. The polar
    /// view draws no base map; its mask and coastline overlays stand in.
    #[must_use]
    pub const fn base_layer(self) -> Option<&'static str> {
        match self {
            Self::Polar => None,
            Self::Regional => Some(ALASKA_BASE_LAYER),
        }
    }

    /// The complete viewport parameters for a new map instance in this
    /// projection.
    ///
    /// Wheel and double-click zoom stay off in both projections so page
    /// scrolling over an embedded map never zooms it.
    #[must_use]
    pub const fn viewport(self) -> ViewportSpec {
        match self {
            Self::Polar => ViewportSpec {
                crs_code: self.code(),
                proj4: EPSG_3572_PROJ4,
                resolutions: EPSG_3572_RESOLUTIONS,
                origin: EPSG_3572_ORIGIN,
                center: LatLng::new(90.0, -150.0),
                initial_zoom: 1,
                min_zoom: 0,
                max_zoom: 4,
                max_bounds: LatLngBounds::new(
                    LatLng::new(40.0, -180.0),
                    LatLng::new(90.0, 180.0),
                ),
                max_bounds_viscosity: 1.0,
                scroll_wheel_zoom: false,
                double_click_zoom: false,
                attribution_control: false,
                zoom_control: ControlCorner::TopRight,
            },
            Self::Regional => ViewportSpec {
                crs_code: self.code(),
                proj4: EPSG_3338_PROJ4,
                resolutions: EPSG_3338_RESOLUTIONS,
                origin: EPSG_3338_ORIGIN,
                center: LatLng::new(64.7, -155.0),
                initial_zoom: 1,
                min_zoom: 1,
                max_zoom: 6,
                // The regional extent crosses the antimeridian, so the bounds
                // are not made sticky.
                max_bounds: LatLngBounds::new(
                    LatLng::new(50.5, 155.0),
                    LatLng::new(64.0, -131.0),
                ),
                max_bounds_viscosity: 0.0,
                scroll_wheel_zoom: false,
                double_click_zoom: false,
                attribution_control: false,
                zoom_control: ControlCorner::TopRight,
            },
        }
    }
}

/// Everything a rendering backend needs to instantiate a map viewport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewportSpec {
    /// EPSG code string of the projection.
    pub crs_code: &'static str,
    /// proj4 definition of the projection.
    pub proj4: &'static str,
    /// Meters-per-pixel ladder, one entry per zoom level.
    pub resolutions: &'static [f64],
    /// Projected coordinate of the tile grid origin.
    pub origin: (f64, f64),
    /// Initial view center.
    pub center: LatLng,
    /// Zoom level the map opens at.
    pub initial_zoom: u8,
    /// Lowest permitted zoom level.
    pub min_zoom: u8,
    /// Highest permitted zoom level.
    pub max_zoom: u8,
    /// Extent panning is constrained to.
    pub max_bounds: LatLngBounds,
    /// How firmly panning sticks inside `max_bounds` (0.0 loose, 1.0 solid).
    pub max_bounds_viscosity: f64,
    /// Whether the scroll wheel zooms the map.
    pub scroll_wheel_zoom: bool,
    /// Whether double-clicking zooms the map.
    pub double_click_zoom: bool,
    /// Whether the backend draws an attribution control.
    pub attribution_control: bool,
    /// Corner the zoom control is placed in.
    pub zoom_control: ControlCorner,
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn regional_viewport_matches_the_alaska_albers_grid() {
        let spec = Crs::Regional.viewport();
        assert_eq!(spec.crs_code, "EPSG:3338");
        assert_eq!(spec.resolutions.len(), 7);
        assert_relative_eq!(spec.resolutions[0], 4096.0);
        assert_relative_eq!(spec.origin.1, 444_809.882_955_059);
        assert_eq!(spec.initial_zoom, 1);
        assert_eq!(spec.max_zoom, 6);
        assert_relative_eq!(spec.max_bounds.south_west.lng, 155.0);
        assert!(spec.proj4.contains("+proj=aea"));
        assert!(spec.proj4.contains("+datum=NAD83"));
    }

    #[test]
    fn polar_viewport_is_centered_on_the_pole() {
        let spec = Crs::Polar.viewport();
        assert_eq!(spec.crs_code, "EPSG:3572");
        assert_eq!(spec.center, LatLng::new(90.0, -150.0));
        assert_eq!(spec.resolutions.len(), 5);
        assert_eq!(spec.min_zoom, 0);
        assert_relative_eq!(spec.max_bounds_viscosity, 1.0);
        assert!(spec.proj4.contains("+proj=laea"));
    }

    #[test]
    fn interaction_defaults_are_shared() {
        for crs in [Crs::Polar, Crs::Regional] {
            let spec = crs.viewport();
            assert!(!spec.scroll_wheel_zoom);
            assert!(!spec.double_click_zoom);
            assert!(!spec.attribution_control);
            assert_eq!(spec.zoom_control, ControlCorner::TopRight);
        }
    }

    #[test]
    fn only_the_regional_view_has_a_base_raster() {
        assert_eq!(Crs::Polar.base_layer(), None);
        assert_eq!(
            Crs::Regional.base_layer(),
            Some("atlas_mapproxy:alaska_osm_retina")
        );
    }
}
