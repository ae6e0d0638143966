//! Identifier types for tracked entities.
//!
//! The backend assigns ids; before it does, an entity created optimistically
//! carries a local placeholder built from a UUID v7.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Prefix of the string form of a local placeholder id.
pub const LOCAL_ID_PREFIX: &str = "local-";

/// Identifier of a tracked entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityId {
    /// Assigned by the backend.
    Server(String),
    /// Synthesized locally before server acknowledgment.
    Local(Uuid),
}

impl EntityId {
    /// Creates a fresh local placeholder id.
    #[must_use]
    pub fn local() -> Self {
        Self::Local(Uuid::now_v7())
    }

    /// Wraps a server-assigned id.
    #[must_use]
    pub fn server(id: impl Into<String>) -> Self {
        Self::Server(id.into())
    }

    /// Returns true if this id has not been confirmed by the server.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }

    /// Parses an id from its string form.
    ///
    /// Never fails: anything that is not a well-formed local placeholder is
    /// treated as a server id.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        s.strip_prefix(LOCAL_ID_PREFIX)
            .and_then(|rest| Uuid::parse_str(rest).ok())
            .map_or_else(|| Self::Server(s.to_string()), Self::Local)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server(id) => f.write_str(id),
            Self::Local(uuid) => write!(f, "{LOCAL_ID_PREFIX}{uuid}"),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}
