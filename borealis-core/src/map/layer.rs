//! Thematic layer descriptors and the per-page catalog.

use std::collections::BTreeMap;

use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Which WMS service renders a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// The general map/tile service.
    Geoserver,
    /// The array/raster ("datacube") service.
    Rasdaman,
}

/// Everything the map manager needs to draw one thematic layer and its
/// legend.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    /// Catalog identifier, unique per page.
    pub id: String,
    /// Human-readable title shown in layer pickers.
    pub title: String,
    /// Service that renders this layer.
    pub source: SourceKind,
    /// Workspace-qualified WMS layer name, e.g. `atlas_mapproxy:alaska_osm`.
    pub wms_layer_name: String,
    /// Named WMS style, when the service default is not wanted.
    pub style: Option<String>,
    /// Extra request parameters, typically datacube axis subsets. These are
    /// applied last and may override the protocol defaults.
    #[serde(default)]
    pub extra_params: BTreeMap<String, serde_json::Value>,
    /// `[west, south, east, north]` extent the map zooms to on activation.
    pub bbox: Option<[f64; 4]>,
    /// Whether a coastline overlay is drawn on top of this layer.
    #[serde(default)]
    pub coastline: bool,
    /// Name of the legend group to display while this layer is active.
    pub legend: String,
    /// Whether this layer is the catalog's initial selection.
    #[serde(default)]
    pub default: bool,
}

/// An ordered collection of layer descriptors, usually one per page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerCatalog(Vec<LayerDescriptor>);

impl LayerCatalog {
    /// Parses a catalog from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parses a catalog from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Adds a layer, skipping it if the id is already present.
    pub fn add_layer(&mut self, layer: LayerDescriptor) {
        if let Some(existing) = self.get(&layer.id) {
            warn!(
                "Ignoring duplicate layer {} ({}) because {} is already configured",
                layer.id, layer.wms_layer_name, existing.wms_layer_name
            );
        } else {
            info!("Configured layer {} ({})", layer.id, layer.wms_layer_name);
            self.0.push(layer);
        }
    }

    /// Looks a layer up by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&LayerDescriptor> {
        self.0.iter().find(|layer| layer.id == id)
    }

    /// The layer selected when a page first loads: the one marked `default`,
    /// or the first in catalog order.
    #[must_use]
    pub fn default_layer(&self) -> Option<&LayerDescriptor> {
        self.0
            .iter()
            .find(|layer| layer.default)
            .or_else(|| self.0.first())
    }

    /// All layers in catalog order.
    #[must_use]
    pub fn layers(&self) -> &[LayerDescriptor] {
        &self.0
    }

    /// Number of layers in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the catalog has no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
