use crate::ids::EntityId;
use crate::location::Location;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// What a tracked entity represents on the ranch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    #[default]
    Cattle,
    Pasture,
    Ranch,
}

/// A ranch record that may carry a location.
///
/// Domain fields (ear tag, breed, weight, ...) are kept as the JSON object the
/// backend returned, so fields this crate does not know about survive a
/// round trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEntity {
    #[serde(alias = "_id")]
    pub id: EntityId,
    #[serde(default)]
    pub kind: EntityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl TrackedEntity {
    #[must_use]
    pub fn new(id: EntityId, kind: EntityKind, data: Map<String, Value>) -> Self {
        Self {
            id,
            kind,
            location: None,
            updated_at: None,
            data,
        }
    }

    /// Extract a string field from `data`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    /// Extract a numeric field from `data`.
    pub fn get_number(&self, key: &str) -> Option<f64> {
        self.data.get(key).and_then(Value::as_f64)
    }

    pub fn ear_tag(&self) -> Option<&str> {
        self.get_str("earTag")
    }

    /// Human readable label: ear tag, then name, then the id.
    #[must_use]
    pub fn label(&self) -> String {
        self.ear_tag()
            .or_else(|| self.get_str("name"))
            .map_or_else(|| self.id.to_string(), str::to_string)
    }

    pub fn has_location(&self) -> bool {
        self.location.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

/// Fields submitted by the cattle creation form.
///
/// Everything is optional here because the form can be submitted half
/// filled; required-field checks happen before any request is made.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CattleFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ear_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    /// Age in years.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<f64>,
    /// Weight in kilograms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pasture_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl CattleFields {
    /// Domain fields as a JSON object, without the location.
    pub fn to_data(&self) -> crate::Result<Map<String, Value>> {
        let mut map = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        map.remove("location");
        Ok(map)
    }

    /// Builds the local, not yet confirmed entity for these fields.
    pub fn to_entity(&self, id: EntityId) -> crate::Result<TrackedEntity> {
        let mut entity = TrackedEntity::new(id, EntityKind::Cattle, self.to_data()?);
        entity.location = self.location.clone();
        Ok(entity)
    }
}
