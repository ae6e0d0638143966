//! Marker colour by reading age.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

/// How old a location reading is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AgeBucket {
    /// Under an hour, including readings stamped in the future.
    Fresh,
    /// One to six hours.
    Recent,
    /// Six to twenty-four hours.
    Stale,
    /// Over a day.
    Old,
}

impl AgeBucket {
    pub fn of(age: TimeDelta) -> Self {
        if age < TimeDelta::hours(1) {
            AgeBucket::Fresh
        } else if age < TimeDelta::hours(6) {
            AgeBucket::Recent
        } else if age <= TimeDelta::hours(24) {
            AgeBucket::Stale
        } else {
            AgeBucket::Old
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            AgeBucket::Fresh => "#22c55e",
            AgeBucket::Recent => "#eab308",
            AgeBucket::Stale => "#f97316",
            AgeBucket::Old => "#ef4444",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeBucket::Fresh => "<1h",
            AgeBucket::Recent => "1-6h",
            AgeBucket::Stale => "6-24h",
            AgeBucket::Old => ">24h",
        }
    }
}

/// Colour of a reading taken at `timestamp`, seen at `now`.
pub fn age_color(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> &'static str {
    AgeBucket::of(now - timestamp).color()
}
