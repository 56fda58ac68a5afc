//! Community search and selection against the places API.

use std::collections::BTreeMap;

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use url::Url;

use super::ApiError;
use crate::map::LatLng;

const COMMUNITIES_PATH: &str = "/places/communities";
const SEARCH_PATH: &str = "/places/search/communities";

/// A named settlement the API can anchor point queries to.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Community {
    /// Stable place identifier, e.g. `AK124`.
    pub id: String,
    /// Primary name.
    pub name: String,
    /// Alternate (often Indigenous) name.
    pub alt_name: Option<String>,
    /// State, province, or territory.
    pub region: Option<String>,
    /// Two-letter country code.
    pub country: Option<String>,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Community {
    /// The community's coordinates as a map location.
    #[must_use]
    pub fn location(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }
}

/// Client for the places API, with a one-shot cache of the full community
/// list.
#[derive(Debug)]
pub struct PlacesClient {
    http: reqwest::Client,
    base: Url,
    communities: Option<Vec<Community>>,
}

impl PlacesClient {
    /// Creates a client against the configured API base URL.
    #[must_use]
    pub fn new(base: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
            communities: None,
        }
    }

    /// All communities, fetched once and cached for the client's lifetime.
    pub async fn communities(&mut self) -> Result<&[Community], ApiError> {
        if self.communities.is_none() {
            let url = super::endpoint_url(&self.base, COMMUNITIES_PATH);
            let payload = super::fetch_json(&self.http, url.clone()).await?;
            let decoded: Vec<Community> =
                serde_json::from_value(payload).map_err(|e| ApiError::UnexpectedPayload {
                    url,
                    reason: e.to_string(),
                })?;
            debug!("Cached {} communities", decoded.len());
            self.communities = Some(decoded);
        }
        Ok(self.communities.as_deref().unwrap_or_default())
    }

    /// Searches communities by name substring, optionally limited to a named
    /// extent. Queries shorter than three characters return nothing without
    /// contacting the service.
    pub async fn search_communities(
        &self,
        substring: &str,
        extent: Option<&str>,
    ) -> Result<Vec<Community>, ApiError> {
        if substring.chars().count() < 3 {
            return Ok(Vec::new());
        }
        let mut url = super::endpoint_url(&self.base, SEARCH_PATH);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("substring", substring);
            if let Some(extent) = extent {
                pairs.append_pair("extent", extent);
            }
        }
        let payload = super::fetch_json(&self.http, url.clone()).await?;
        serde_json::from_value(payload).map_err(|e| ApiError::UnexpectedPayload {
            url,
            reason: e.to_string(),
        })
    }

    /// Picks a random community, balanced so that countries with many listed
    /// places are not overrepresented.
    pub async fn random_location<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Community, ApiError> {
        let picked = pick_balanced(self.communities().await?, rng).cloned();
        picked.ok_or_else(|| ApiError::UnexpectedPayload {
            url: super::endpoint_url(&self.base, COMMUNITIES_PATH),
            reason: "empty community list".to_string(),
        })
    }
}

/// Uniformly picks a country, then a member. Canada gets a second balancing
/// level by region, since its community list is dominated by a few provinces.
fn pick_balanced<'c, R: Rng + ?Sized>(
    communities: &'c [Community],
    rng: &mut R,
) -> Option<&'c Community> {
    let by_country = group_by(communities.iter(), |c| c.country.as_deref());
    let countries: Vec<_> = by_country.into_iter().collect();
    let (country, members) = countries.choose(rng)?;
    if *country == "CA" {
        let by_region = group_by(members.iter().copied(), |c| c.region.as_deref());
        let regions: Vec<_> = by_region.into_iter().collect();
        let (_, members) = regions.choose(rng)?;
        members.choose(rng).copied()
    } else {
        members.choose(rng).copied()
    }
}

/// Groups communities by a key, folding missing and blank keys into
/// `Unknown`. The map is ordered so selection is reproducible under a seeded
/// generator.
fn group_by<'c>(
    communities: impl Iterator<Item = &'c Community>,
    key: impl Fn(&Community) -> Option<&str>,
) -> BTreeMap<&'c str, Vec<&'c Community>> {
    let mut groups: BTreeMap<&'c str, Vec<&'c Community>> = BTreeMap::new();
    for community in communities {
        let name = key(community)
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .unwrap_or("Unknown");
        groups.entry(name).or_default().push(community);
    }
    groups
}
