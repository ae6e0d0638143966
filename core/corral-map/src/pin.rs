//! Render-ready location pins.

use chrono::{DateTime, TimeDelta, Utc};
use corral_types::{CattleLocation, Coordinate, EntityId, LocationSource, TrackedEntity};
use serde::Serialize;

/// Prefix of every pin id.
pub const PIN_ID_PREFIX: &str = "pin-";

/// The pin id for an entity. Pure: the same entity always maps to the same pin.
pub fn pin_id(entity_id: &EntityId) -> String {
    format!("{PIN_ID_PREFIX}{entity_id}")
}

/// Projection of an entity that currently has a location.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPin {
    pub id: String,
    pub entity_id: EntityId,
    pub label: String,
    pub coordinate: Coordinate,
    pub accuracy: Option<f64>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    /// Where the reading came from.
    pub added_by: LocationSource,
}

impl LocationPin {
    /// Builds the pin for `entity`, or `None` when it has no usable location.
    pub fn from_entity(entity: &TrackedEntity) -> Option<Self> {
        let location = entity.location.as_ref()?;
        let coordinate = location.coordinate();
        if !coordinate.is_valid() {
            return None;
        }
        Some(Self {
            id: pin_id(&entity.id),
            entity_id: entity.id.clone(),
            label: entity.label(),
            coordinate,
            accuracy: location.accuracy,
            timestamp: location.timestamp,
            activity: entity.get_str("activity").map(str::to_string),
            added_by: location.source,
        })
    }

    /// Builds the pin for a row of `/maps/cattle-locations`.
    pub fn from_cattle_location(row: &CattleLocation) -> Option<Self> {
        let coordinate = row.location.coordinate();
        if !coordinate.is_valid() {
            return None;
        }
        Some(Self {
            id: pin_id(&row.cattle_id),
            entity_id: row.cattle_id.clone(),
            label: row.ear_tag.clone(),
            coordinate,
            accuracy: row.location.accuracy,
            timestamp: row.location.timestamp,
            activity: row.activity.clone(),
            added_by: row.location.source,
        })
    }

    /// Age of the reading at `now`. Negative for readings from the future.
    pub fn age(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.timestamp
    }

    /// Popup text shown with the marker.
    pub fn detail(&self) -> String {
        let mut text = format!(
            "{}\n{:.5}, {:.5}",
            self.label, self.coordinate.lat, self.coordinate.lng
        );
        if let Some(accuracy) = self.accuracy {
            text.push_str(&format!("\n±{accuracy:.0} m"));
        }
        if let Some(activity) = &self.activity {
            text.push_str(&format!("\n{activity}"));
        }
        text.push_str(&format!("\n{}", self.timestamp.format("%Y-%m-%d %H:%M UTC")));
        text
    }
}

/// Pins for every located entity, in entity order, one per entity id.
pub fn pins_for(entities: &[TrackedEntity]) -> Vec<LocationPin> {
    let mut pins: indexmap::IndexMap<String, LocationPin> = indexmap::IndexMap::new();
    for pin in entities.iter().filter_map(LocationPin::from_entity) {
        pins.insert(pin.id.clone(), pin);
    }
    pins.into_values().collect()
}
