#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

/// Clients for the climate-data point API and the places API.
pub mod client;

/// Runtime configuration: the three service base URLs.
pub mod config;

/// Map instances, thematic layers, and legends.
pub mod map;

/// WMS request assembly for the tile service boundary.
pub mod wms;

mod error;
pub use error::{BorealisCoreError, BorealisCoreResult};
