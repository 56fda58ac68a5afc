mod crs;
mod error;
mod geo;
mod headless;
mod layer;
mod legend;
mod manager;
mod places;
mod renderer;

pub use crs::{Crs, ViewportSpec};
pub use error::MapError;
pub use geo::{LatLng, LatLngBounds};
pub use headless::{Attachment, HeadlessMap, HeadlessRenderer};
pub use layer::{LayerCatalog, LayerDescriptor, SourceKind};
pub use legend::{LegendGroups, LegendItem};
pub use manager::{COASTLINE_LAYER, MapManager, POLAR_MASK_LAYER};
pub use places::{CIRCUMPOLAR_PLACES, Place};
pub use renderer::{ControlCorner, LayerHandle, MapRenderer};
