//! Async clients for the climate API: point data, community places, and
//! polygon areas of interest.
//!
//! Each client owns a [`reqwest::Client`] and a configured base URL. Bodies
//! arrive as JSON; point-data payloads stay as raw [`serde_json::Value`]
//! trees since their shape varies per dataset.

mod error;

pub mod data;
pub mod places;
pub mod polygons;

pub use error::ApiError;

use log::debug;
use serde_json::Value;
use url::Url;

/// Joins an API path onto a configured base URL, tolerating trailing slashes
/// on the base.
pub(crate) fn endpoint_url(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    url.set_path(&format!("{}{path}", base.path().trim_end_matches('/')));
    url
}

/// Fetches a URL and decodes the JSON body.
pub(crate) async fn fetch_json(http: &reqwest::Client, url: Url) -> Result<Value, ApiError> {
    debug!("Fetching {url}");
    let response = http.get(url.clone()).send().await?;
    if !response.status().is_success() {
        return Err(ApiError::Status {
            url,
            status: response.status(),
        });
    }
    Ok(response.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_tolerates_trailing_slashes() {
        let plain = Url::parse("https://earthmaps.io").unwrap();
        let slashed = Url::parse("https://example.test/api/").unwrap();
        assert_eq!(
            endpoint_url(&plain, "/temperature/point/").as_str(),
            "https://earthmaps.io/temperature/point/"
        );
        assert_eq!(
            endpoint_url(&slashed, "/places/communities").as_str(),
            "https://example.test/api/places/communities"
        );
    }
}
