//! Point queries against the climate datasets.

use std::collections::HashMap;

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::ApiError;

/// Every dataset the API serves point queries for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    /// Terrain elevation.
    Elevation,
    /// Modeled flammability.
    Flammability,
    /// Climate protection from spruce beetles.
    Beetles,
    /// CMIP6 monthly variables.
    Cmip6Monthly,
    /// CMIP6-derived indicators.
    IndicatorsCmip6,
    /// Degree days below 0 degrees F.
    DegreeDaysBelow0,
    /// Heating degree days.
    HeatingDegreeDays,
    /// Hydrologic variables.
    Hydrology,
    /// Base climate indicators.
    Indicators,
    /// Landfast sea ice extent.
    LandfastSeaIce,
    /// Air freezing index.
    FreezingIndex,
    /// Mean annual temperature.
    MeanAnnualTemperature,
    /// GIPL permafrost model output.
    Permafrost,
    /// Precipitation normals and projections.
    Precipitation,
    /// Precipitation frequency (return intervals).
    PrecipitationFrequency,
    /// Sea ice concentration.
    SeaIceConcentration,
    /// Temperature normals and projections.
    Temperature,
    /// Temperature anomalies.
    TemperatureAnomalies,
    /// Air thawing index.
    ThawingIndex,
    /// Modeled vegetation type.
    VegType,
    /// Wet days per year.
    WetDaysPerYear,
}

impl Dataset {
    /// All datasets, in catalog order.
    pub const ALL: &'static [Self] = &[
        Self::Elevation,
        Self::Flammability,
        Self::Beetles,
        Self::Cmip6Monthly,
        Self::IndicatorsCmip6,
        Self::DegreeDaysBelow0,
        Self::HeatingDegreeDays,
        Self::Hydrology,
        Self::Indicators,
        Self::LandfastSeaIce,
        Self::FreezingIndex,
        Self::MeanAnnualTemperature,
        Self::Permafrost,
        Self::Precipitation,
        Self::PrecipitationFrequency,
        Self::SeaIceConcentration,
        Self::Temperature,
        Self::TemperatureAnomalies,
        Self::ThawingIndex,
        Self::VegType,
        Self::WetDaysPerYear,
    ];

    /// The API path point queries for this dataset go to, with a trailing
    /// slash so `{lat}/{lng}` appends directly.
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Elevation => "/elevation/point/",
            Self::Flammability => "/alfresco/flammability/local/",
            Self::Beetles => "/beetles/point/",
            Self::Cmip6Monthly => "/cmip6/point/",
            Self::IndicatorsCmip6 => "/indicators/cmip6/point/",
            Self::DegreeDaysBelow0 => "/degree_days/below_zero/",
            Self::HeatingDegreeDays => "/degree_days/heating/",
            Self::Hydrology => "/hydrology/point/",
            Self::Indicators => "/indicators/base/point/",
            Self::LandfastSeaIce => "/landfastice/point/",
            Self::FreezingIndex => "/degree_days/freezing_index/",
            Self::MeanAnnualTemperature => "/temperature/",
            Self::Permafrost => "/permafrost/point/gipl/",
            Self::Precipitation => "/precipitation/point/",
            Self::PrecipitationFrequency => "/precipitation/frequency/point/",
            Self::SeaIceConcentration => "/seaice/point/",
            Self::Temperature => "/temperature/point/",
            Self::TemperatureAnomalies => "/temperature_anomalies/point/",
            Self::ThawingIndex => "/degree_days/thawing_index/",
            Self::VegType => "/alfresco/veg_type/local/",
            Self::WetDaysPerYear => "/wet_days_per_year/all/point/",
        }
    }
}

/// Client for dataset point queries.
#[derive(Debug, Clone)]
pub struct DataClient {
    http: reqwest::Client,
    base: Url,
}

impl DataClient {
    /// Creates a client against the configured API base URL.
    #[must_use]
    pub fn new(base: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
        }
    }

    /// Fetches one dataset at a point. The payload shape varies per dataset,
    /// so it is returned as a raw JSON tree.
    pub async fn fetch_point(
        &self,
        dataset: Dataset,
        lat: f64,
        lng: f64,
        query: &[(&str, &str)],
    ) -> Result<Value, ApiError> {
        let url = self.point_url(dataset, lat, lng, query);
        super::fetch_json(&self.http, url).await
    }

    fn point_url(&self, dataset: Dataset, lat: f64, lng: f64, query: &[(&str, &str)]) -> Url {
        let path = format!("{}{lat}/{lng}", dataset.endpoint());
        let mut url = super::endpoint_url(&self.base, &path);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }
}

/// Fetched point payloads keyed by dataset, with per-dataset error flags so
/// one failing dataset never hides the others.
#[derive(Debug)]
pub struct PointDataStore {
    client: DataClient,
    payloads: HashMap<Dataset, Value>,
    errors: HashMap<Dataset, bool>,
}

impl PointDataStore {
    /// Creates an empty store backed by `client`.
    #[must_use]
    pub fn new(client: DataClient) -> Self {
        Self {
            client,
            payloads: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    /// Fetches one dataset at a point, replacing any payload already stored
    /// for it. A failed fetch leaves no stale payload behind and flags the
    /// dataset instead.
    pub async fn fetch(&mut self, dataset: Dataset, lat: f64, lng: f64) {
        self.payloads.remove(&dataset);
        self.errors.insert(dataset, false);
        match self.client.fetch_point(dataset, lat, lng, &[]).await {
            Ok(payload) => {
                self.payloads.insert(dataset, payload);
            }
            Err(error) => {
                warn!("Point query for {dataset:?} failed: {error}");
                self.errors.insert(dataset, true);
            }
        }
    }

    /// The stored payload for a dataset, if its last fetch succeeded.
    #[must_use]
    pub fn payload(&self, dataset: Dataset) -> Option<&Value> {
        self.payloads.get(&dataset)
    }

    /// Whether the last fetch of a dataset failed. Never-fetched datasets are
    /// not in error.
    #[must_use]
    pub fn has_error(&self, dataset: Dataset) -> bool {
        self.errors.get(&dataset).copied().unwrap_or(false)
    }
}
