//! Small spatial helpers shared by queries, fallbacks and the map layer.

use crate::location::Coordinate;
use serde::{Deserialize, Serialize};

/// Mean Earth radius used by [`haversine_m`].
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Great-circle distance between two coordinates, in metres.
#[must_use]
pub fn haversine_m(a: Coordinate, b: Coordinate) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().clamp(0.0, 1.0).asin()
}

/// A lat/lng rectangle given by its north-east and south-west corners.
///
/// Boxes crossing the antimeridian are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub ne: Coordinate,
    pub sw: Coordinate,
}

impl BoundingBox {
    #[must_use]
    pub const fn new(ne: Coordinate, sw: Coordinate) -> Self {
        Self { ne, sw }
    }

    /// Smallest box containing every point, or `None` for an empty input.
    pub fn around(points: impl IntoIterator<Item = Coordinate>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut ne, mut sw) = (first, first);
        for p in iter {
            ne.lat = ne.lat.max(p.lat);
            ne.lng = ne.lng.max(p.lng);
            sw.lat = sw.lat.min(p.lat);
            sw.lng = sw.lng.min(p.lng);
        }
        Some(Self { ne, sw })
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, point: Coordinate) -> bool {
        (self.sw.lat..=self.ne.lat).contains(&point.lat)
            && (self.sw.lng..=self.ne.lng).contains(&point.lng)
    }

    #[must_use]
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.ne.lat + self.sw.lat) / 2.0,
            (self.ne.lng + self.sw.lng) / 2.0,
        )
    }
}
