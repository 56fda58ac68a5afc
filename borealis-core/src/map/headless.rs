//! An in-memory renderer that records what it is told to draw.
//!
//! Useful for tests and for server-side code that needs to know what a page
//! would display without a browser in the loop.

use std::collections::HashMap;

use log::debug;

use super::error::MapError;
use super::geo::LatLngBounds;
use super::legend::LegendItem;
use super::places::Place;
use super::renderer::{ControlCorner, LayerHandle, MapRenderer};
use crate::map::crs::ViewportSpec;
use crate::wms::TileRequest;

/// One recorded layer addition.
#[derive(Debug, Clone, PartialEq)]
pub enum Attachment {
    /// A WMS tile layer and the request that configures it.
    TileLayer(TileRequest),
    /// Place labels with their anchor coordinates.
    PlaceLabels(Vec<Place>),
}

impl Attachment {
    /// The tile request, when this attachment is a tile layer.
    #[must_use]
    pub fn tile_request(&self) -> Option<&TileRequest> {
        match self {
            Self::TileLayer(request) => Some(request),
            Self::PlaceLabels(_) => None,
        }
    }
}

/// The recorded state of one live map.
#[derive(Debug, Clone)]
pub struct HeadlessMap {
    viewport: ViewportSpec,
    attachments: Vec<(LayerHandle, Attachment)>,
    fitted_bounds: Option<LatLngBounds>,
    legend: Option<(ControlCorner, Vec<LegendItem>)>,
}

impl HeadlessMap {
    /// The viewport the map was created with.
    #[must_use]
    pub fn viewport(&self) -> &ViewportSpec {
        &self.viewport
    }

    /// Every attached layer, oldest first.
    #[must_use]
    pub fn attachments(&self) -> &[(LayerHandle, Attachment)] {
        &self.attachments
    }

    /// The tile requests among the attachments, oldest first.
    pub fn tile_requests(&self) -> impl Iterator<Item = &TileRequest> {
        self.attachments
            .iter()
            .filter_map(|(_, attachment)| attachment.tile_request())
    }

    /// The bounds most recently fitted, if any.
    #[must_use]
    pub fn fitted_bounds(&self) -> Option<LatLngBounds> {
        self.fitted_bounds
    }

    /// The current legend control, if one is set.
    #[must_use]
    pub fn legend(&self) -> Option<(ControlCorner, &[LegendItem])> {
        self.legend
            .as_ref()
            .map(|(corner, items)| (*corner, items.as_slice()))
    }
}

/// A [`MapRenderer`] that draws nothing and remembers everything.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    maps: HashMap<String, HeadlessMap>,
    next_handle: u64,
}

impl HeadlessRenderer {
    /// Creates an empty renderer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded state of one map, if it is live.
    #[must_use]
    pub fn map(&self, map_id: &str) -> Option<&HeadlessMap> {
        self.maps.get(map_id)
    }

    /// Number of live maps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    /// Returns `true` if no maps are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    fn mint_handle(&mut self) -> LayerHandle {
        self.next_handle += 1;
        LayerHandle::new(self.next_handle)
    }

    fn live_map(&mut self, map_id: &str) -> Result<&mut HeadlessMap, MapError> {
        self.maps.get_mut(map_id).ok_or_else(|| MapError::Backend {
            map_id: map_id.to_string(),
            message: "no live map object".to_string(),
        })
    }
}

impl MapRenderer for HeadlessRenderer {
    fn create_map(&mut self, map_id: &str, viewport: &ViewportSpec) -> Result<(), MapError> {
        debug!("Creating headless map {map_id} in {}", viewport.crs_code);
        self.maps.insert(
            map_id.to_string(),
            HeadlessMap {
                viewport: viewport.clone(),
                attachments: Vec::new(),
                fitted_bounds: None,
                legend: None,
            },
        );
        Ok(())
    }

    fn destroy_map(&mut self, map_id: &str) {
        if self.maps.remove(map_id).is_none() {
            debug!("Ignoring destroy of unknown map {map_id}");
        }
    }

    fn add_tile_layer(
        &mut self,
        map_id: &str,
        request: &TileRequest,
    ) -> Result<LayerHandle, MapError> {
        let handle = self.mint_handle();
        let map = self.live_map(map_id)?;
        map.attachments
            .push((handle, Attachment::TileLayer(request.clone())));
        Ok(handle)
    }

    fn add_place_labels(
        &mut self,
        map_id: &str,
        places: &[Place],
    ) -> Result<LayerHandle, MapError> {
        let handle = self.mint_handle();
        let map = self.live_map(map_id)?;
        map.attachments
            .push((handle, Attachment::PlaceLabels(places.to_vec())));
        Ok(handle)
    }

    fn remove_layer(&mut self, map_id: &str, handle: LayerHandle) {
        if let Some(map) = self.maps.get_mut(map_id) {
            map.attachments.retain(|(existing, _)| *existing != handle);
        }
    }

    fn fit_bounds(&mut self, map_id: &str, bounds: LatLngBounds) {
        if let Some(map) = self.maps.get_mut(map_id) {
            map.fitted_bounds = Some(bounds);
        }
    }

    fn set_legend(&mut self, map_id: &str, corner: ControlCorner, items: &[LegendItem]) {
        if let Some(map) = self.maps.get_mut(map_id) {
            map.legend = Some((corner, items.to_vec()));
        }
    }

    fn clear_legend(&mut self, map_id: &str) {
        if let Some(map) = self.maps.get_mut(map_id) {
            map.legend = None;
        }
    }
}
