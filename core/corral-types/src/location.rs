//! Location payloads carried by tracked entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns true if both components are finite and inside the WGS84 range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Where a location reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationSource {
    Gps,
    Manual,
    Estimated,
}

/// The last known location of a tracked entity.
///
/// Every update replaces the whole value; fields are never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    /// Horizontal accuracy in metres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    pub timestamp: DateTime<Utc>,
    pub source: LocationSource,
}

impl Location {
    /// Creates a location stamped with the current time.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, source: LocationSource) -> Self {
        Self {
            latitude,
            longitude,
            altitude: None,
            accuracy: None,
            timestamp: Utc::now(),
            source,
        }
    }

    #[must_use]
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    #[must_use]
    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Device-side tracking settings sent with every location update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingConfig {
    #[serde(rename = "enableGPS")]
    pub enable_gps: bool,
    /// Seconds between device reports.
    pub update_interval: u32,
    pub geofence_alerts: bool,
    pub activity_monitoring: bool,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            enable_gps: true,
            update_interval: 300,
            geofence_alerts: true,
            activity_monitoring: false,
        }
    }
}

/// Body of `PUT /cattle/:id/location`.
///
/// `tracking_config` is serialized after `location`, matching what the
/// backend expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdate {
    pub location: Location,
    pub tracking_config: TrackingConfig,
}

impl LocationUpdate {
    #[must_use]
    pub fn new(location: Location) -> Self {
        Self {
            location,
            tracking_config: TrackingConfig::default(),
        }
    }

    #[must_use]
    pub fn with_tracking_config(mut self, tracking_config: TrackingConfig) -> Self {
        self.tracking_config = tracking_config;
        self
    }
}
