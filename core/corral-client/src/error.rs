//! Client error types.

use crate::transport::TransportFailure;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors a request through the resilient client can end in.
///
/// `Timeout`, `NetworkUnavailable` and `ExhaustedRetries` are transport
/// errors; everything else means a response was received (or never attempted).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("network unavailable: {0}")]
    NetworkUnavailable(TransportFailure),

    #[error("gave up after {attempts} attempts: {last}")]
    ExhaustedRetries {
        attempts: u32,
        last: TransportFailure,
    },

    #[error("server responded {status}: {message}")]
    Application { status: u16, message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("response envelope carried no data")]
    MissingData,

    #[error("credential store error: {0}")]
    Credential(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Returns true if no response was received.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Timeout { .. }
                | ClientError::NetworkUnavailable(_)
                | ClientError::ExhaustedRetries { .. }
        )
    }

    /// Returns true if the failure came from connection-level trouble that a
    /// later, manual retry might get past. Timeouts are excluded: the
    /// backend may still be processing the request.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::NetworkUnavailable(_) | ClientError::ExhaustedRetries { .. }
        )
    }

    /// Returns true for an HTTP response with a non-2xx status, or a 2xx
    /// envelope reporting `success: false`.
    pub fn is_application(&self) -> bool {
        matches!(self, ClientError::Application { .. })
    }

    /// The HTTP status of an application error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Application { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true for a 401 response.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
