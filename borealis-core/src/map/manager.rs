//! Map instance lifecycle and thematic layer toggling.

use std::collections::HashMap;

use log::{debug, info, warn};
use url::Url;

use super::crs::Crs;
use super::error::MapError;
use super::geo::LatLngBounds;
use super::layer::{LayerDescriptor, SourceKind};
use super::legend::{LegendGroups, LegendItem};
use super::places::CIRCUMPOLAR_PLACES;
use super::renderer::{ControlCorner, LayerHandle, MapRenderer};
use crate::config::Config;
use crate::wms::TileRequest;

/// Overlay masking everything outside the polar projection domain.
pub const POLAR_MASK_LAYER: &str = "atlas_mapproxy:circumpolar_mask";
/// Coastline overlay drawn on top of layers that request it.
pub const COASTLINE_LAYER: &str = "natural_earth:ne_10m_coastline";

const LEGEND_CORNER: ControlCorner = ControlCorner::TopLeft;

/// Per-map bookkeeping: the projection it was created in and the handles that
/// must be removed when the active layer changes.
#[derive(Debug)]
struct MapEntry {
    crs: Crs,
    tile_layer: Option<LayerHandle>,
    aux_overlays: Vec<LayerHandle>,
    active_layer: Option<LayerDescriptor>,
}

/// Owns every live map on a page: creation, thematic layer toggling, legend
/// state, and teardown.
///
/// ```rust
/// use borealis_core::config::Config;
/// use borealis_core::map::{Crs, HeadlessRenderer, MapManager};
///
/// let mut manager = MapManager::new(HeadlessRenderer::new(), &Config::default());
/// manager.create("weather", Crs::Regional)?;
/// assert!(manager.active_layer("weather").is_none());
/// # Ok::<(), borealis_core::map::MapError>(())
/// ```
#[derive(Debug)]
pub struct MapManager<R: MapRenderer> {
    renderer: R,
    geoserver_url: Url,
    rasdaman_url: Url,
    maps: HashMap<String, MapEntry>,
    legends: HashMap<String, LegendGroups>,
}

impl<R: MapRenderer> MapManager<R> {
    /// Creates a manager driving `renderer`, with tile requests built against
    /// the configured service URLs.
    pub fn new(renderer: R, config: &Config) -> Self {
        Self {
            renderer,
            geoserver_url: config.geoserver_url.clone(),
            rasdaman_url: config.rasdaman_url.clone(),
            maps: HashMap::new(),
            legends: HashMap::new(),
        }
    }

    /// The rendering backend, e.g. to inspect recorded state in tests.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The layer currently shown on a map, if one has been toggled on.
    #[must_use]
    pub fn active_layer(&self, map_id: &str) -> Option<&LayerDescriptor> {
        self.maps
            .get(map_id)
            .and_then(|entry| entry.active_layer.as_ref())
    }

    /// Every map that currently shows a thematic layer.
    pub fn active_layers(&self) -> impl Iterator<Item = (&str, &LayerDescriptor)> {
        self.maps.iter().filter_map(|(map_id, entry)| {
            entry
                .active_layer
                .as_ref()
                .map(|layer| (map_id.as_str(), layer))
        })
    }

    /// Instantiates a map under `map_id` in the given projection, replacing
    /// any map already live under that id. The regional projection gets its
    /// base raster immediately; thematic layers arrive via
    /// [`toggle_layer`](Self::toggle_layer).
    pub fn create(&mut self, map_id: &str, crs: Crs) -> Result<(), MapError> {
        if self.maps.contains_key(map_id) {
            warn!("Replacing live map {map_id}");
            self.destroy(map_id);
        }

        self.renderer.create_map(map_id, &crs.viewport())?;
        if let Some(base) = crs.base_layer() {
            // The base raster lives as long as the map, so its handle is not
            // tracked for removal.
            let request = TileRequest::new(self.geoserver_url.clone(), base);
            self.renderer.add_tile_layer(map_id, &request)?;
        }

        self.maps.insert(
            map_id.to_string(),
            MapEntry {
                crs,
                tile_layer: None,
                aux_overlays: Vec::new(),
                active_layer: None,
            },
        );
        info!("Created {} map {map_id}", crs.code());
        Ok(())
    }

    /// Tears a map down and forgets its legend groups. Destroying a map that
    /// is not live is a no-op.
    pub fn destroy(&mut self, map_id: &str) {
        if self.maps.remove(map_id).is_some() {
            self.renderer.destroy_map(map_id);
            self.legends.remove(map_id);
            info!("Destroyed map {map_id}");
        } else {
            debug!("Ignoring destroy of unknown map {map_id}");
        }
    }

    /// Registers the legend groups available on a map, replacing any previous
    /// registration. Layer toggles fail until this has been called.
    pub fn set_legend_items(&mut self, map_id: &str, groups: LegendGroups) {
        debug!(
            "Registering {} legend groups for map {map_id}",
            groups.len()
        );
        self.legends.insert(map_id.to_string(), groups);
    }

    /// Switches a map to `layer`: the previous thematic layer and every
    /// auxiliary overlay come off, the new layer goes on with whatever
    /// overlays it needs, and the legend control is rebuilt.
    ///
    /// Toggling on a map that is not live is tolerated and does nothing, so
    /// callers racing map teardown need no coordination. If the backend
    /// refuses an add partway through, the partial stack comes off again and
    /// the map is left bare.
    pub fn toggle_layer(&mut self, map_id: &str, layer: &LayerDescriptor) -> Result<(), MapError> {
        let Some(entry) = self.maps.get(map_id) else {
            debug!("Ignoring layer toggle on unknown map {map_id}");
            return Ok(());
        };
        let crs = entry.crs;

        // Validate before touching the map, so a failed toggle leaves the
        // previous layer in place.
        let legend_rows = self.legend_rows(map_id, &layer.legend)?.to_vec();

        self.remove_active_layers(map_id);

        let mut attached = Vec::new();
        let tile_layer = match self.attach_layer_stack(map_id, crs, layer, &mut attached) {
            Ok(tile_layer) => tile_layer,
            Err(error) => {
                // A refused add leaves no half-built stack behind.
                for handle in attached {
                    self.renderer.remove_layer(map_id, handle);
                }
                return Err(error);
            }
        };

        // Everything attached besides the thematic layer itself is an
        // auxiliary overlay and comes off with it on the next toggle.
        attached.retain(|handle| *handle != tile_layer);

        if let Some(entry) = self.maps.get_mut(map_id) {
            entry.tile_layer = Some(tile_layer);
            entry.aux_overlays = attached;
            entry.active_layer = Some(layer.clone());
        }

        self.renderer.clear_legend(map_id);
        self.renderer.set_legend(map_id, LEGEND_CORNER, &legend_rows);

        debug!("Toggled map {map_id} to layer {}", layer.id);
        Ok(())
    }

    /// Rebuilds the legend control from a registered group without changing
    /// layers.
    pub fn add_legend(&mut self, map_id: &str, group: &str) -> Result<(), MapError> {
        let rows = self.legend_rows(map_id, group)?.to_vec();
        self.renderer.clear_legend(map_id);
        self.renderer.set_legend(map_id, LEGEND_CORNER, &rows);
        Ok(())
    }

    fn legend_rows(&self, map_id: &str, group: &str) -> Result<&[LegendItem], MapError> {
        let groups = self
            .legends
            .get(map_id)
            .ok_or_else(|| MapError::LegendNotRegistered {
                map_id: map_id.to_string(),
            })?;
        groups
            .get(group)
            .map(Vec::as_slice)
            .ok_or_else(|| MapError::LegendGroupMissing {
                map_id: map_id.to_string(),
                group: group.to_string(),
            })
    }

    // Every handle minted here lands in `attached`, the thematic layer's
    // included, so the caller can detach a partially built stack.
    fn attach_layer_stack(
        &mut self,
        map_id: &str,
        crs: Crs,
        layer: &LayerDescriptor,
        attached: &mut Vec<LayerHandle>,
    ) -> Result<LayerHandle, MapError> {
        if crs == Crs::Polar {
            // Mask below the thematic layer, so loading artifacts outside the
            // projection domain never show.
            let mask = TileRequest::new(self.geoserver_url.clone(), POLAR_MASK_LAYER);
            attached.push(self.renderer.add_tile_layer(map_id, &mask)?);
        }

        let request = TileRequest::for_layer(self.tile_base(layer.source).clone(), layer);
        let tile_layer = self.renderer.add_tile_layer(map_id, &request)?;
        attached.push(tile_layer);

        if crs == Crs::Polar {
            // No base map in the polar projection; labeled settlements give
            // the viewer bearings instead.
            attached.push(self.renderer.add_place_labels(map_id, CIRCUMPOLAR_PLACES)?);
        }

        if let Some(bbox) = layer.bbox {
            self.renderer
                .fit_bounds(map_id, LatLngBounds::from_wsen(bbox));
        }

        if layer.coastline {
            let coastline = TileRequest::new(self.geoserver_url.clone(), COASTLINE_LAYER);
            attached.push(self.renderer.add_tile_layer(map_id, &coastline)?);
        }

        Ok(tile_layer)
    }

    fn remove_active_layers(&mut self, map_id: &str) {
        let Some(entry) = self.maps.get_mut(map_id) else {
            return;
        };
        let tile_layer = entry.tile_layer.take();
        let aux_overlays = std::mem::take(&mut entry.aux_overlays);
        entry.active_layer = None;

        if let Some(handle) = tile_layer {
            self.renderer.remove_layer(map_id, handle);
        }
        for handle in aux_overlays {
            self.renderer.remove_layer(map_id, handle);
        }
    }

    fn tile_base(&self, source: SourceKind) -> &Url {
        match source {
            SourceKind::Geoserver => &self.geoserver_url,
            SourceKind::Rasdaman => &self.rasdaman_url,
        }
    }
}
