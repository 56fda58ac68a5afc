//! Legend rows and their per-map grouping.
//!
//! Legend content is data-driven: each map registers a set of named groups
//! (usually one per thematic layer) and the manager swaps the rendered rows
//! whenever the active layer changes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One color swatch with its caption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendItem {
    /// CSS color of the swatch, e.g. `#2166ac`.
    pub color: String,
    /// Caption drawn next to the swatch.
    pub label: String,
}

impl LegendItem {
    /// Creates a legend row.
    pub fn new(color: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            label: label.into(),
        }
    }
}

/// Named legend groups registered for one map, keyed by the legend name the
/// layer descriptors reference.
pub type LegendGroups = HashMap<String, Vec<LegendItem>>;
