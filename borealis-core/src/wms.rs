//! WMS request assembly.
//!
//! Base rasters, thematic layers, and overlays are all fetched as WMS tiles.
//! A [`TileRequest`] carries the service base URL plus the query parameters a
//! tiled WMS client sends with every tile; parameter merging is
//! last-write-wins, so per-layer extras such as datacube axis subsets can
//! override the protocol defaults.

use url::Url;

use crate::map::LayerDescriptor;

/// WMS protocol version sent with every request.
pub const WMS_VERSION: &str = "1.3.0";
/// Image format requested for every tile.
pub const TILE_FORMAT: &str = "image/png";

/// One configured WMS tile source: where to ask, and what to ask for.
#[derive(Debug, Clone, PartialEq)]
pub struct TileRequest {
    base: Url,
    params: Vec<(String, String)>,
}

impl TileRequest {
    /// Creates a request for a plain layer with the protocol defaults:
    /// transparent PNG tiles at version [`WMS_VERSION`].
    #[must_use]
    pub fn new(base: Url, wms_layer_name: &str) -> Self {
        Self {
            base,
            params: vec![
                ("transparent".to_string(), "true".to_string()),
                ("format".to_string(), TILE_FORMAT.to_string()),
                ("version".to_string(), WMS_VERSION.to_string()),
                ("layers".to_string(), wms_layer_name.to_string()),
            ],
        }
    }

    /// Creates the request for a catalog layer: the defaults, the layer's
    /// named style when it has one, then its extra parameters, which may
    /// override anything set before them.
    #[must_use]
    pub fn for_layer(base: Url, layer: &LayerDescriptor) -> Self {
        let mut request = Self::new(base, &layer.wms_layer_name);
        if let Some(style) = &layer.style {
            request.set_param("styles", style.as_str());
        }
        for (key, value) in &layer.extra_params {
            request.set_param(key.as_str(), scalar_text(value));
        }
        request
    }

    /// Sets a parameter, replacing an existing value in place so parameter
    /// order stays stable.
    pub fn set_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(existing) = self.params.iter_mut().find(|(k, _)| k.as_str() == key) {
            existing.1 = value;
        } else {
            self.params.push((key, value));
        }
    }

    /// Looks a parameter up by key.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v.as_str())
    }

    /// All parameters in merge order.
    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// The service base URL.
    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// The base URL with the configured parameters attached, the form a tiled
    /// WMS client is initialized with.
    #[must_use]
    pub fn endpoint_url(&self) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut().extend_pairs(&self.params);
        url
    }

    /// A complete `GetMap` URL for one image of `width` by `height` pixels
    /// covering `bbox` (in projected coordinates of `crs_code`).
    #[must_use]
    pub fn get_map_url(&self, crs_code: &str, bbox: [f64; 4], width: u32, height: u32) -> Url {
        let mut url = self.base.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("service", "WMS");
            pairs.append_pair("request", "GetMap");
            pairs.extend_pairs(&self.params);
            pairs.append_pair("crs", crs_code);
            pairs.append_pair(
                "bbox",
                &format!("{},{},{},{}", bbox[0], bbox[1], bbox[2], bbox[3]),
            );
            pairs.append_pair("width", &width.to_string());
            pairs.append_pair("height", &height.to_string());
        }
        url
    }
}

/// Renders a JSON scalar the way it belongs in a query string: strings bare,
/// everything else in its JSON form.
fn scalar_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
