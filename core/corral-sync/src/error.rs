//! Error types for the sync layer.

use corral_client::ClientError;
use corral_types::EntityId;
use std::fmt;
use thiserror::Error;

/// Result type for coordinator operations.
pub type CoordinatorResult<T> = Result<T, CoordinatorError>;

/// One field that failed local validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Wire name of the field (`earTag`, `weight`, ...).
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Every field that blocked a submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The error for `field`, if it failed.
    pub fn field(&self, field: &str) -> Option<&FieldError> {
        self.fields.iter().find(|f| f.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid fields: ")?;
        for (i, e) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} ({})", e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Errors surfaced by the optimistic CRUD coordinator.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// Required fields missing or out of range; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The user declined the destructive-action prompt.
    #[error("action cancelled by user")]
    ConfirmationAborted,

    /// Another mutation from this view is still in flight.
    #[error("another change is still being submitted")]
    Busy,

    #[error("entity not found: {0}")]
    NotFound(EntityId),

    /// A location update resolved after a newer one had been applied.
    #[error("stale location update for {0} discarded")]
    StaleUpdate(EntityId),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("serialization error: {0}")]
    Serialization(#[from] corral_types::Error),

    #[error(transparent)]
    Geolocation(#[from] GeolocationError),
}

impl CoordinatorError {
    /// The HTTP status of an application error from the backend.
    pub fn status(&self) -> Option<u16> {
        match self {
            CoordinatorError::Client(e) => e.status(),
            _ => None,
        }
    }
}

/// Why a position could not be acquired.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable: {0}")]
    Unavailable(String),

    #[error("no position within {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}
