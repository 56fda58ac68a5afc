//! Polygonal areas of interest: named boundary collections and their
//! geometries.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::ApiError;

/// One named collection of boundary polygons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolygonCategory {
    /// Display name of the collection.
    pub name: &'static str,
    /// API path listing its features.
    pub endpoint: &'static str,
}

/// Every polygon collection the API serves.
pub const POLYGON_CATEGORIES: &[PolygonCategory] = &[
    PolygonCategory {
        name: "Hydrological Unit",
        endpoint: "/places/hucs",
    },
    PolygonCategory {
        name: "Protected Area",
        endpoint: "/places/protected_areas",
    },
    PolygonCategory {
        name: "Alaska Native Corporation",
        endpoint: "/places/corporations",
    },
    PolygonCategory {
        name: "Alaska Climate Division",
        endpoint: "/places/climate_divisions",
    },
    PolygonCategory {
        name: "Fire Management Zone",
        endpoint: "/places/fire_zones",
    },
    PolygonCategory {
        name: "Ethnolinguistic Region",
        endpoint: "/places/ethnolinguistic_regions",
    },
    PolygonCategory {
        name: "Alaska Borough",
        endpoint: "/places/boroughs",
    },
    PolygonCategory {
        name: "Alaska Census Area",
        endpoint: "/places/census_areas",
    },
    PolygonCategory {
        name: "Game Management Unit",
        endpoint: "/places/game_management_units",
    },
    PolygonCategory {
        name: "First Nation",
        endpoint: "/places/first_nations",
    },
];

/// Feature identifier. Some collections use numeric ids, others codes like
/// `FWS12`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    /// Code identifier.
    Text(String),
    /// Numeric identifier.
    Number(i64),
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(id) => f.write_str(id),
            Self::Number(id) => write!(f, "{id}"),
        }
    }
}

/// One feature in a polygon collection listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonFeature {
    /// Identifier accepted by the boundary endpoint.
    pub id: FeatureId,
    /// Display name.
    pub name: String,
    /// Collection-specific feature type, e.g. `huc`.
    #[serde(rename = "type")]
    pub kind: String,
}

/// A feature's boundary as a GeoJSON-shaped document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureGeometry {
    /// GeoJSON object type, usually `Feature`.
    #[serde(rename = "type")]
    pub kind: String,
    /// The geometry itself.
    pub geometry: Geometry,
}

/// GeoJSON geometry with the coordinates kept raw, since their nesting depth
/// depends on the geometry type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Geometry type, e.g. `Polygon` or `MultiPolygon`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Nested coordinate arrays.
    pub coordinates: Value,
}

/// Client for polygon listings and boundary geometries.
#[derive(Debug, Clone)]
pub struct PolygonsClient {
    http: reqwest::Client,
    base: Url,
}

impl PolygonsClient {
    /// Creates a client against the configured API base URL.
    #[must_use]
    pub fn new(base: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
        }
    }

    /// Lists the features of one collection.
    pub async fn features(
        &self,
        category: PolygonCategory,
    ) -> Result<Vec<PolygonFeature>, ApiError> {
        let url = super::endpoint_url(&self.base, category.endpoint);
        let payload = super::fetch_json(&self.http, url.clone()).await?;
        serde_json::from_value(payload).map_err(|e| ApiError::UnexpectedPayload {
            url,
            reason: e.to_string(),
        })
    }

    /// Fetches the boundary geometry of one feature.
    pub async fn boundary(&self, id: &FeatureId) -> Result<FeatureGeometry, ApiError> {
        let url = self.boundary_url(id);
        let payload = super::fetch_json(&self.http, url.clone()).await?;
        serde_json::from_value(payload).map_err(|e| ApiError::UnexpectedPayload {
            url,
            reason: e.to_string(),
        })
    }

    /// Draws a random feature: a uniformly random category, then a uniformly
    /// random feature from it, then that feature's boundary.
    pub async fn random_polygon<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<RandomPolygon, ApiError> {
        let category = pick_category(rng);
        let features = self.features(category).await?;
        let feature = pick_feature(features, rng).ok_or_else(|| ApiError::UnexpectedPayload {
            url: super::endpoint_url(&self.base, category.endpoint),
            reason: "empty feature list".to_string(),
        })?;
        let geometry = self.boundary(&feature.id).await?;
        Ok(RandomPolygon {
            category,
            feature,
            geometry,
        })
    }

    fn boundary_url(&self, id: &FeatureId) -> Url {
        super::endpoint_url(&self.base, &format!("/boundary/area/{id}"))
    }
}

/// A randomly drawn area of interest.
#[derive(Debug, Clone)]
pub struct RandomPolygon {
    /// Collection the feature was drawn from.
    pub category: PolygonCategory,
    /// The drawn feature.
    pub feature: PolygonFeature,
    /// Its boundary geometry.
    pub geometry: FeatureGeometry,
}

/// Uniformly picks one of the fixed polygon collections.
fn pick_category<R: Rng + ?Sized>(rng: &mut R) -> PolygonCategory {
    POLYGON_CATEGORIES[rng.gen_range(0..POLYGON_CATEGORIES.len())]
}

/// Uniformly draws one feature, consuming the listing.
fn pick_feature<R: Rng + ?Sized>(
    mut features: Vec<PolygonFeature>,
    rng: &mut R,
) -> Option<PolygonFeature> {
    if features.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..features.len());
    Some(features.swap_remove(index))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use serde_json::json;

    use super::*;

    fn feature(id: i64, name: &str) -> PolygonFeature {
        PolygonFeature {
            id: FeatureId::Number(id),
            name: name.to_string(),
            kind: "huc".to_string(),
        }
    }

    #[test]
    fn the_category_table_is_complete() {
        assert_eq!(POLYGON_CATEGORIES.len(), 10);
        assert_eq!(POLYGON_CATEGORIES[0].name, "Hydrological Unit");
        assert_eq!(POLYGON_CATEGORIES[9].endpoint, "/places/first_nations");

        let endpoints: HashSet<_> = POLYGON_CATEGORIES.iter().map(|c| c.endpoint).collect();
        assert_eq!(endpoints.len(), POLYGON_CATEGORIES.len());
        assert!(endpoints.iter().all(|e| e.starts_with("/places/")));
    }

    #[test]
    fn feature_ids_come_in_both_shapes() {
        let numeric: PolygonFeature =
            serde_json::from_value(json!({"id": 19_010_208, "name": "Koyukuk", "type": "huc"}))
                .unwrap();
        assert_eq!(numeric.id, FeatureId::Number(19_010_208));
        assert_eq!(numeric.kind, "huc");

        let coded: PolygonFeature = serde_json::from_value(
            json!({"id": "FWS12", "name": "Yukon Delta", "type": "protected_area"}),
        )
        .unwrap();
        assert_eq!(coded.id, FeatureId::Text("FWS12".to_string()));
        assert_eq!(coded.id.to_string(), "FWS12");
    }

    #[test]
    fn boundary_urls_put_the_id_in_the_path() {
        let client = PolygonsClient::new(Url::parse("https://earthmaps.io").unwrap());
        assert_eq!(
            client.boundary_url(&FeatureId::Number(19_010_208)).as_str(),
            "https://earthmaps.io/boundary/area/19010208"
        );
        assert_eq!(
            client
                .boundary_url(&FeatureId::Text("FWS12".to_string()))
                .as_str(),
            "https://earthmaps.io/boundary/area/FWS12"
        );
    }

    #[test]
    fn every_category_can_be_drawn() {
        let mut rng = SmallRng::seed_from_u64(7);
        let drawn: HashSet<_> = (0..200).map(|_| pick_category(&mut rng).name).collect();
        assert_eq!(drawn.len(), POLYGON_CATEGORIES.len());
    }

    #[test]
    fn feature_draws_come_from_the_listing() {
        let mut rng = SmallRng::seed_from_u64(7);
        assert_eq!(pick_feature(Vec::new(), &mut rng), None);

        let listing = vec![feature(19_010_208, "Koyukuk"), feature(19_010_404, "Anvik")];
        let mut drawn = HashSet::new();
        for _ in 0..40 {
            let picked = pick_feature(listing.clone(), &mut rng).unwrap();
            assert!(listing.contains(&picked));
            drawn.insert(picked.name);
        }
        assert_eq!(drawn.len(), listing.len());
    }
}
