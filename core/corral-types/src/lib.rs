//! Core type definitions for Corral.
//!
//! This crate defines the wire and domain types shared by the sync core:
//! - Entity identifiers (server-assigned or local placeholders)
//! - Tracked entities and their locations
//! - The `{ success, data, message }` response envelope
//! - Read payloads of the map, dashboard and statistics endpoints
//!
//! Nothing here performs I/O.

mod dashboard;
mod entity;
mod envelope;
pub mod geo;
mod ids;
mod location;
mod maps;

pub use dashboard::{
    CattleStats, CountBy, DashboardOverview, HealthBreakdown, HealthEvent, HealthMetrics,
    MetricPoint, ProductionMetrics, RanchContact, RanchProfile,
};
pub use entity::{CattleFields, EntityKind, Sex, TrackedEntity};
pub use envelope::{ApiEnvelope, EnvelopeMessage};
pub use geo::{haversine_m, BoundingBox};
pub use ids::{EntityId, LOCAL_ID_PREFIX};
pub use location::{Coordinate, Location, LocationSource, LocationUpdate, TrackingConfig};
pub use maps::{
    area_query, CattleLocation, Infrastructure, NearbyQuery, OverviewOptions, Pasture,
    PastureBoundary, RanchBoundaries, RanchOverview, RanchSummary,
};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
