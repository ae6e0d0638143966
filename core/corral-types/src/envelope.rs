//! The JSON envelope every backend response is wrapped in.

use serde::{Deserialize, Serialize};

/// `{ success, data, message? }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Just the `message` of an envelope, for reading error bodies whose `data`
/// shape is unknown.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvelopeMessage {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl EnvelopeMessage {
    /// Extracts a message from a raw error body, if it is an envelope.
    pub fn from_body(body: &str) -> Option<String> {
        let parsed: Self = serde_json::from_str(body).ok()?;
        parsed.message.or(parsed.error).filter(|m| !m.is_empty())
    }
}
