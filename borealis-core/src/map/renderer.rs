//! The seam between layer management and whatever actually draws the map.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use super::error::MapError;
use super::geo::LatLngBounds;
use super::legend::LegendItem;
use super::places::Place;
use crate::map::crs::ViewportSpec;
use crate::wms::TileRequest;

/// Opaque identifier a renderer assigns to each added layer, used to remove
/// exactly that layer later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerHandle(u64);

impl LayerHandle {
    /// Creates a handle from a renderer-chosen value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }
}

/// Screen corner a map control is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlCorner {
    /// Top left corner, where legends go.
    TopLeft,
    /// Top right corner, where the zoom control goes.
    TopRight,
}

/// What a rendering backend must provide for the map manager to drive it.
///
/// Additions return a [`LayerHandle`] or an error; removals are silent, since
/// removing something already gone needs no recovery. All methods are
/// synchronous: renderers queue their own drawing work.
pub trait MapRenderer: Debug {
    /// Instantiates a map viewport under `map_id`.
    fn create_map(&mut self, map_id: &str, viewport: &ViewportSpec) -> Result<(), MapError>;

    /// Tears the map down, releasing everything attached to it.
    fn destroy_map(&mut self, map_id: &str);

    /// Adds a WMS tile layer to the map.
    fn add_tile_layer(
        &mut self,
        map_id: &str,
        request: &TileRequest,
    ) -> Result<LayerHandle, MapError>;

    /// Adds a set of place labels to the map.
    fn add_place_labels(
        &mut self,
        map_id: &str,
        places: &[Place],
    ) -> Result<LayerHandle, MapError>;

    /// Removes a previously added layer. Unknown handles are ignored.
    fn remove_layer(&mut self, map_id: &str, handle: LayerHandle);

    /// Pans and zooms the map to show `bounds`.
    fn fit_bounds(&mut self, map_id: &str, bounds: LatLngBounds);

    /// Replaces the map's legend control with `items` in `corner`.
    fn set_legend(&mut self, map_id: &str, corner: ControlCorner, items: &[LegendItem]);

    /// Removes the map's legend control, if any.
    fn clear_legend(&mut self, map_id: &str);
}
