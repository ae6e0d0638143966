//! Payloads of the dashboard, statistics and ranch profile endpoints.

use crate::location::Coordinate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountBy {
    pub label: String,
    pub count: u32,
}

impl CountBy {
    #[must_use]
    pub fn new(label: impl Into<String>, count: u32) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthBreakdown {
    pub healthy: u32,
    pub sick: u32,
    pub under_treatment: u32,
    pub quarantine: u32,
}

impl HealthBreakdown {
    #[must_use]
    pub fn total(&self) -> u32 {
        self.healthy + self.sick + self.under_treatment + self.quarantine
    }
}

/// `GET /cattle/stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CattleStats {
    pub total: u32,
    /// Animals with a known location.
    pub tracked: u32,
    pub average_weight: f64,
    #[serde(default)]
    pub by_breed: Vec<CountBy>,
    #[serde(default)]
    pub by_sex: Vec<CountBy>,
    #[serde(default)]
    pub health: HealthBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RanchContact {
    pub phone: String,
    pub email: String,
}

/// `GET /ranch/profile` and the body of `PUT /ranch/profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RanchProfile {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinate>,
    pub total_area_hectares: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub established_year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<RanchContact>,
}

/// `GET /dashboard/overview`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub total_cattle: u32,
    pub healthy_cattle: u32,
    pub pending_vaccinations: u32,
    pub active_alerts: u32,
    pub total_pastures: u32,
    /// Fraction of pasture capacity in use, `0.0..=1.0`.
    pub occupancy_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub label: String,
    pub value: f64,
}

impl MetricPoint {
    #[must_use]
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// `GET /dashboard/production-metrics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionMetrics {
    pub period: String,
    pub milk_liters_daily_avg: f64,
    pub weight_gain_kg_daily_avg: f64,
    pub births: u32,
    pub sales: u32,
    #[serde(default)]
    pub series: Vec<MetricPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthEvent {
    pub ear_tag: String,
    pub description: String,
    pub date: DateTime<Utc>,
}

/// `GET /dashboard/health-metrics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetrics {
    pub breakdown: HealthBreakdown,
    /// Fraction of the herd with an up to date vaccination schedule.
    pub vaccination_coverage: f64,
    pub upcoming_vaccinations: u32,
    #[serde(default)]
    pub recent_events: Vec<HealthEvent>,
}
