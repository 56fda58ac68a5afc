//! Runtime configuration for the atlas building blocks.
//!
//! Everything configurable is three base URLs: the general map/tile WMS
//! service, the array/raster ("datacube") WMS service, and the climate
//! point-data/places API. They come from a YAML file, the `BOREALIS_*`
//! environment variables, or the compiled-in production defaults, with the
//! environment winning over the file.

// Environment variable access that can be mocked in tests.
pub mod env;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use self::env::Env;

/// Environment override for [`Config::geoserver_url`].
pub const ENV_GEOSERVER_URL: &str = "BOREALIS_GEOSERVER_URL";
/// Environment override for [`Config::rasdaman_url`].
pub const ENV_RASDAMAN_URL: &str = "BOREALIS_RASDAMAN_URL";
/// Environment override for [`Config::api_url`].
pub const ENV_API_URL: &str = "BOREALIS_API_URL";

const DEFAULT_GEOSERVER_URL: &str = "https://gs.earthmaps.io/geoserver/wms";
const DEFAULT_RASDAMAN_URL: &str = "https://maps.earthmaps.io/rasdaman/ows";
const DEFAULT_API_URL: &str = "https://earthmaps.io";

/// The three service base URLs every request is built against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// General map/tile WMS service (base rasters, thematic layers, overlays).
    pub geoserver_url: Url,
    /// Array/raster WMS service for datacube-backed layers.
    pub rasdaman_url: Url,
    /// Climate point-data and places API.
    pub api_url: Url,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geoserver_url: Url::parse(DEFAULT_GEOSERVER_URL).expect("default URL is valid"),
            rasdaman_url: Url::parse(DEFAULT_RASDAMAN_URL).expect("default URL is valid"),
            api_url: Url::parse(DEFAULT_API_URL).expect("default URL is valid"),
        }
    }
}

impl Config {
    /// Reads a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ConfigLoadError(e, path.to_path_buf()))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ConfigError::ConfigParseError(e, path.to_path_buf()))
    }

    /// Applies the `BOREALIS_*` environment overrides on top of `self`.
    pub fn apply_env(&mut self, env: &impl Env) -> Result<(), ConfigError> {
        for (key, url) in [
            (ENV_GEOSERVER_URL, &mut self.geoserver_url),
            (ENV_RASDAMAN_URL, &mut self.rasdaman_url),
            (ENV_API_URL, &mut self.api_url),
        ] {
            if let Some(value) = env.get_env_str(key) {
                *url = Url::parse(&value).map_err(|e| ConfigError::InvalidUrl(e, key, value))?;
            }
        }
        Ok(())
    }

    /// Loads configuration from an optional file plus the environment.
    /// Environment values override file values; absent sources fall back to
    /// the production defaults.
    pub fn load(file: Option<&Path>, env: &impl Env) -> Result<Self, ConfigError> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(env)?;
        Ok(config)
    }
}

/// Errors that can occur while loading configuration.
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Unable to read the config file.
    #[error("Unable to load config file {1}: {0}")]
    ConfigLoadError(std::io::Error, PathBuf),

    /// The config file does not parse as a [`Config`].
    #[error("Unable to parse config file {1}: {0}")]
    ConfigParseError(serde_yaml::Error, PathBuf),

    /// A URL value is not a valid URL.
    #[error("Invalid URL in {1}: {0} ({2})")]
    InvalidUrl(url::ParseError, &'static str, String),
}
