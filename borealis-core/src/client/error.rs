use reqwest::StatusCode;
use url::Url;

/// Errors raised by the API clients.
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// Transport-level failure, including JSON bodies that do not decode.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("{url} returned HTTP status {status}")]
    Status {
        /// The request that failed.
        url: Url,
        /// The status the service answered with.
        status: StatusCode,
    },

    /// The body decoded as JSON, but not into what the client expected.
    #[error("Unexpected payload from {url}: {reason}")]
    UnexpectedPayload {
        /// The request whose answer was unusable.
        url: Url,
        /// What was wrong with it.
        reason: String,
    },
}
