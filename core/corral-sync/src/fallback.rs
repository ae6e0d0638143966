//! Live reads with a demo-data substitute.
//!
//! Every read goes through [`FallbackProvider::fetch_or_fallback`], which never
//! fails: if the live call errors, the static dataset for that endpoint is
//! returned instead and tagged [`DataSource::Fallback`].

use crate::datasets;
use crate::health::ConnectionStatus;
use corral_client::{ClientResult, RanchApi};
use corral_types::{
    haversine_m, BoundingBox, CattleLocation, CattleStats, DashboardOverview, HealthMetrics,
    NearbyQuery, OverviewOptions, ProductionMetrics, RanchBoundaries, RanchOverview,
    RanchProfile, TrackedEntity,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use tokio::sync::watch;
use tracing::{debug, warn};

/// A type with a schema-valid substitute value.
pub trait Fallback: Sized {
    fn fallback() -> Self;
}

impl Fallback for Vec<TrackedEntity> {
    fn fallback() -> Self {
        datasets::cattle()
    }
}

impl Fallback for Vec<CattleLocation> {
    fn fallback() -> Self {
        datasets::cattle_locations()
    }
}

impl Fallback for CattleStats {
    fn fallback() -> Self {
        datasets::cattle_stats()
    }
}

impl Fallback for RanchOverview {
    fn fallback() -> Self {
        datasets::ranch_overview()
    }
}

impl Fallback for RanchBoundaries {
    fn fallback() -> Self {
        datasets::ranch_boundaries()
    }
}

impl Fallback for RanchProfile {
    fn fallback() -> Self {
        datasets::ranch_profile()
    }
}

impl Fallback for DashboardOverview {
    fn fallback() -> Self {
        datasets::dashboard_overview()
    }
}

impl Fallback for ProductionMetrics {
    fn fallback() -> Self {
        datasets::production_metrics()
    }
}

impl Fallback for HealthMetrics {
    fn fallback() -> Self {
        datasets::health_metrics()
    }
}

/// Where a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Fallback,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DataSource::Live => "live",
            DataSource::Fallback => "fallback",
        })
    }
}

/// A value tagged with its source.
#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    pub data: T,
    pub source: DataSource,
}

impl<T> Sourced<T> {
    pub fn live(data: T) -> Self {
        Self {
            data,
            source: DataSource::Live,
        }
    }

    pub fn fallback(data: T) -> Self {
        Self {
            data,
            source: DataSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == DataSource::Fallback
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced {
            data: f(self.data),
            source: self.source,
        }
    }
}

/// Reads through [`RanchApi`], substituting demo data on failure.
#[derive(Debug, Clone)]
pub struct FallbackProvider {
    api: RanchApi,
    health: Option<watch::Receiver<ConnectionStatus>>,
    prefer_fallback_when_offline: bool,
}

impl FallbackProvider {
    pub fn new(api: RanchApi) -> Self {
        Self {
            api,
            health: None,
            prefer_fallback_when_offline: false,
        }
    }

    /// Skips the network entirely while the monitor reports the backend down.
    #[must_use]
    pub fn with_health_gate(mut self, status: watch::Receiver<ConnectionStatus>) -> Self {
        self.health = Some(status);
        self.prefer_fallback_when_offline = true;
        self
    }

    pub fn api(&self) -> &RanchApi {
        &self.api
    }

    fn offline(&self) -> bool {
        self.prefer_fallback_when_offline
            && self
                .health
                .as_ref()
                .is_some_and(|rx| rx.borrow().is_offline())
    }

    /// Runs `read`; on any error returns `substitute()` tagged as fallback.
    pub async fn fetch_or_else<T, F, Fut>(
        &self,
        operation: &str,
        read: F,
        substitute: impl FnOnce() -> T,
    ) -> Sourced<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        if self.offline() {
            debug!("{operation}: backend offline, serving fallback");
            return Sourced::fallback(substitute());
        }
        match read().await {
            Ok(data) => Sourced::live(data),
            Err(e) => {
                warn!("{operation}: serving fallback data: {e}");
                Sourced::fallback(substitute())
            }
        }
    }

    /// Runs `read`; on any error returns `T::fallback()`.
    pub async fn fetch_or_fallback<T, F, Fut>(&self, operation: &str, read: F) -> Sourced<T>
    where
        T: Fallback,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        self.fetch_or_else(operation, read, T::fallback).await
    }

    pub async fn cattle(&self) -> Sourced<Vec<TrackedEntity>> {
        self.fetch_or_fallback("cattle", || self.api.list_cattle()).await
    }

    pub async fn cattle_locations(&self) -> Sourced<Vec<CattleLocation>> {
        self.fetch_or_fallback("cattle_locations", || self.api.cattle_locations())
            .await
    }

    /// Nearby cattle; the fallback keeps only animals within the radius.
    pub async fn nearby(&self, query: &NearbyQuery) -> Sourced<Vec<CattleLocation>> {
        self.fetch_or_else(
            "nearby",
            || self.api.nearby(query),
            || {
                datasets::cattle_locations()
                    .into_iter()
                    .filter(|c| haversine_m(query.center, c.location.coordinate()) <= query.radius_m)
                    .collect()
            },
        )
        .await
    }

    /// Cattle inside an area; the fallback keeps only animals inside the box.
    pub async fn by_area(&self, area: &BoundingBox) -> Sourced<Vec<CattleLocation>> {
        self.fetch_or_else(
            "by_area",
            || self.api.by_area(area),
            || {
                datasets::cattle_locations()
                    .into_iter()
                    .filter(|c| area.contains(c.location.coordinate()))
                    .collect()
            },
        )
        .await
    }

    pub async fn cattle_stats(&self) -> Sourced<CattleStats> {
        self.fetch_or_fallback("cattle_stats", || self.api.cattle_stats())
            .await
    }

    /// Ranch overview; the fallback honours the include flags.
    pub async fn ranch_overview(&self, options: &OverviewOptions) -> Sourced<RanchOverview> {
        self.fetch_or_else(
            "ranch_overview",
            || self.api.ranch_overview(options),
            || {
                let mut overview = datasets::ranch_overview();
                options.apply(&mut overview);
                overview
            },
        )
        .await
    }

    pub async fn ranch_boundaries(&self) -> Sourced<RanchBoundaries> {
        self.fetch_or_fallback("ranch_boundaries", || self.api.ranch_boundaries())
            .await
    }

    pub async fn ranch_profile(&self) -> Sourced<RanchProfile> {
        self.fetch_or_fallback("ranch_profile", || self.api.ranch_profile())
            .await
    }

    pub async fn dashboard_overview(&self) -> Sourced<DashboardOverview> {
        self.fetch_or_fallback("dashboard_overview", || self.api.dashboard_overview())
            .await
    }

    pub async fn production_metrics(&self) -> Sourced<ProductionMetrics> {
        self.fetch_or_fallback("production_metrics", || self.api.production_metrics())
            .await
    }

    pub async fn health_metrics(&self) -> Sourced<HealthMetrics> {
        self.fetch_or_fallback("health_metrics", || self.api.health_metrics())
            .await
    }
}
