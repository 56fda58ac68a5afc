/// Errors raised by map instance and layer management.
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum MapError {
    /// No legend groups were registered for the map before a layer toggle.
    #[error("No legend data is registered for map {map_id}")]
    LegendNotRegistered {
        /// The map instance the toggle targeted.
        map_id: String,
    },

    /// The map has legend data, but not for the requested group.
    #[error("Legend group {group:?} is not registered for map {map_id}")]
    LegendGroupMissing {
        /// The map instance the toggle targeted.
        map_id: String,
        /// The legend group the active layer asked for.
        group: String,
    },

    /// The rendering backend rejected an operation.
    #[error("Mapping backend failure on map {map_id}: {message}")]
    Backend {
        /// The map instance the operation targeted.
        map_id: String,
        /// Backend-supplied failure detail.
        message: String,
    },
}
