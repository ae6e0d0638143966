//! Client-side sync core for Corral.
//!
//! # Components
//!
//! - **Store**: the upstream entity list, publishing a revision on each change
//! - **Coordinator**: optimistic create/update, confirmed delete, location updates
//! - **Health**: periodic `/ping` probes exposed as a connection status
//! - **Fallback**: live reads that substitute demo data on failure
//! - **Geolocation**: current position with a cache and a deadline
//!
//! The coordinator only talks to views through the [`EntityStore`]; map views
//! subscribe to its revisions and re-derive their pins.
//!
//! # Example
//!
//! ```no_run
//! use corral_client::{ClientConfig, RanchApi, ResilientClient};
//! use corral_sync::{AutoConfirm, Coordinator, EntityStore};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ResilientClient::anonymous(ClientConfig::default())?;
//! let store = EntityStore::new();
//! let coordinator = Coordinator::new(RanchApi::new(client), store.clone(), Arc::new(AutoConfirm(true)));
//! coordinator.refresh().await?;
//! # Ok(())
//! # }
//! ```

pub mod coordinator;
pub mod datasets;
mod error;
pub mod fallback;
pub mod geolocation;
pub mod health;
mod store;
pub mod validation;

pub use coordinator::{AutoConfirm, Confirmation, Coordinator, OrderingPolicy};
pub use error::{CoordinatorError, CoordinatorResult, FieldError, GeolocationError, ValidationError};
pub use fallback::{DataSource, Fallback, FallbackProvider, Sourced};
pub use geolocation::{Geolocator, Position, PositionOptions, PositionSensor};
pub use health::{ConnectionStatus, HealthConfig, HealthMonitor, MonitorState, ProbeReport};
pub use store::EntityStore;
pub use validation::validate_cattle;
