//! Payloads of the `/maps/*` and `/cattle/*` read endpoints.

use crate::geo::BoundingBox;
use crate::ids::EntityId;
use crate::location::{Coordinate, Location};
use serde::{Deserialize, Serialize};

/// One animal's last known position, as listed by `/maps/cattle-locations`,
/// `/cattle/nearby` and `/cattle/by-area`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CattleLocation {
    pub cattle_id: EntityId,
    pub ear_tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pasture {
    pub id: EntityId,
    pub name: String,
    pub area_hectares: f64,
    pub capacity: u32,
    pub current_occupancy: u32,
    pub status: String,
    pub boundary: Vec<Coordinate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Infrastructure {
    pub id: String,
    pub name: String,
    /// Free-form category: water trough, corral, gate, barn...
    pub category: String,
    pub coordinate: Coordinate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RanchSummary {
    pub id: String,
    pub name: String,
    pub center: Coordinate,
    pub total_area_hectares: f64,
}

/// `GET /maps/ranch-overview`.
///
/// The three collections are always present; the `include*` flags only decide
/// whether they are filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RanchOverview {
    pub ranch: RanchSummary,
    #[serde(default)]
    pub potreros: Vec<Pasture>,
    #[serde(default)]
    pub ganado: Vec<CattleLocation>,
    #[serde(default)]
    pub infraestructura: Vec<Infrastructure>,
    pub bounds: BoundingBox,
}

/// Which collections a ranch overview request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverviewOptions {
    pub include_potreros: bool,
    pub include_ganado: bool,
    pub include_infraestructura: bool,
}

impl Default for OverviewOptions {
    fn default() -> Self {
        Self {
            include_potreros: true,
            include_ganado: true,
            include_infraestructura: true,
        }
    }
}

impl OverviewOptions {
    /// Query string pairs in wire naming.
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        vec![
            ("includePotreros".into(), self.include_potreros.to_string()),
            ("includeGanado".into(), self.include_ganado.to_string()),
            (
                "includeInfraestructura".into(),
                self.include_infraestructura.to_string(),
            ),
        ]
    }

    /// Empties the collections that were not asked for.
    pub fn apply(&self, overview: &mut RanchOverview) {
        if !self.include_potreros {
            overview.potreros.clear();
        }
        if !self.include_ganado {
            overview.ganado.clear();
        }
        if !self.include_infraestructura {
            overview.infraestructura.clear();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PastureBoundary {
    pub id: EntityId,
    pub name: String,
    pub boundary: Vec<Coordinate>,
}

/// `GET /maps/ranch-boundaries`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RanchBoundaries {
    pub perimeter: Vec<Coordinate>,
    #[serde(default)]
    pub pastures: Vec<PastureBoundary>,
    pub total_area_hectares: f64,
}

/// Parameters of `GET /cattle/nearby`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyQuery {
    pub center: Coordinate,
    /// Radius in metres.
    pub radius_m: f64,
}

impl NearbyQuery {
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        vec![
            ("lat".into(), self.center.lat.to_string()),
            ("lng".into(), self.center.lng.to_string()),
            ("radius".into(), self.radius_m.to_string()),
        ]
    }
}

/// Query pairs of `GET /cattle/by-area`.
#[must_use]
pub fn area_query(area: &BoundingBox) -> Vec<(String, String)> {
    vec![
        ("ne_lat".into(), area.ne.lat.to_string()),
        ("ne_lng".into(), area.ne.lng.to_string()),
        ("sw_lat".into(), area.sw.lat.to_string()),
        ("sw_lng".into(), area.sw.lng.to_string()),
    ]
}
