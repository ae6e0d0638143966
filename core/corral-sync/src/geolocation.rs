//! Acquiring the device's current position.
//!
//! [`Geolocator::current_position`] is a single async call: it serves a cached
//! fix when one is fresh enough, otherwise reads the [`PositionSensor`] under a
//! deadline.

use crate::error::GeolocationError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use corral_types::{Coordinate, Location, LocationSource};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Options for one position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PositionOptions {
    /// Deadline for the sensor read.
    pub timeout_ms: u64,
    /// Oldest cached fix that may be served instead of a fresh read.
    /// Zero always reads the sensor.
    pub max_cache_age_ms: u64,
    pub high_accuracy: bool,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            max_cache_age_ms: 60_000,
            high_accuracy: true,
        }
    }
}

/// A position fix.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub coordinate: Coordinate,
    /// Horizontal accuracy in metres.
    pub accuracy: Option<f64>,
    pub altitude: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl Position {
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            accuracy: None,
            altitude: None,
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    /// Converts the fix into a location payload.
    pub fn into_location(self, source: LocationSource) -> Location {
        Location {
            latitude: self.coordinate.lat,
            longitude: self.coordinate.lng,
            altitude: self.altitude,
            accuracy: self.accuracy,
            timestamp: self.timestamp,
            source,
        }
    }
}

/// The positioning hardware (or whatever stands in for it).
#[async_trait]
pub trait PositionSensor: Send + Sync {
    async fn read(&self, high_accuracy: bool) -> Result<Position, GeolocationError>;
}

/// Serves positions from a sensor, caching the last fix.
pub struct Geolocator {
    sensor: Arc<dyn PositionSensor>,
    last_fix: Mutex<Option<(Instant, Position)>>,
}

impl Geolocator {
    pub fn new(sensor: Arc<dyn PositionSensor>) -> Self {
        Self {
            sensor,
            last_fix: Mutex::new(None),
        }
    }

    fn cached(&self, max_age: Duration) -> Option<Position> {
        if max_age.is_zero() {
            return None;
        }
        let guard = self.last_fix.lock().ok()?;
        let (at, position) = guard.as_ref()?;
        (at.elapsed() < max_age).then(|| position.clone())
    }

    /// Returns a fix no older than `max_cache_age_ms`, reading the sensor if
    /// the cache cannot serve one.
    pub async fn current_position(
        &self,
        options: PositionOptions,
    ) -> Result<Position, GeolocationError> {
        if let Some(position) = self.cached(Duration::from_millis(options.max_cache_age_ms)) {
            debug!("Serving cached position");
            return Ok(position);
        }

        let read = self.sensor.read(options.high_accuracy);
        let position = tokio::time::timeout(Duration::from_millis(options.timeout_ms), read)
            .await
            .map_err(|_| GeolocationError::Timeout {
                timeout_ms: options.timeout_ms,
            })??;

        if let Ok(mut guard) = self.last_fix.lock() {
            *guard = Some((Instant::now(), position.clone()));
        }
        Ok(position)
    }

    /// Forgets the cached fix.
    pub fn clear_cache(&self) {
        if let Ok(mut guard) = self.last_fix.lock() {
            *guard = None;
        }
    }
}

impl std::fmt::Debug for Geolocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Geolocator").finish_non_exhaustive()
    }
}
