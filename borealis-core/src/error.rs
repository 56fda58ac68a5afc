use crate::client::ApiError;
use crate::config::ConfigError;
use crate::map::MapError;

/// Errors that can occur across the atlas building blocks.
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum BorealisCoreError {
    /// Errors from [`map`](crate::map) lifecycle and legend operations.
    #[error(transparent)]
    MapError(#[from] MapError),

    /// Errors from the [`client`](crate::client) HTTP boundaries.
    #[error(transparent)]
    ApiError(#[from] ApiError),

    /// Errors from [`config`](crate::config) loading.
    #[error(transparent)]
    ConfigError(#[from] ConfigError),

    /// Errors occurring from other sources, not implemented by `borealis-core`.
    #[error(transparent)]
    OtherError(#[from] Box<dyn std::error::Error>),
}

/// A convenience [`Result`] for operations coming from `borealis-core`.
pub type BorealisCoreResult<T> = Result<T, BorealisCoreError>;
