//! Error types for the map layer.

use thiserror::Error;

/// Result type for map operations.
pub type MapResult<T> = Result<T, MapError>;

/// Errors raised by a map surface or engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// The single load attempt failed.
    #[error("map engine failed to load: {0}")]
    EngineLoad(String),

    #[error("failed to mount map: {0}")]
    Mount(String),

    /// An engine rejected a marker primitive.
    #[error("marker operation failed: {0}")]
    Marker(String),

    #[error("unknown marker {0}")]
    UnknownMarker(u64),
}
