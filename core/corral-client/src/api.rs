//! Typed calls for every backend endpoint the sync core consumes.

use crate::client::ResilientClient;
use crate::error::ClientResult;
use crate::request::RequestSpec;
use corral_types::{
    area_query, BoundingBox, CattleFields, CattleLocation, CattleStats, DashboardOverview,
    EntityId, HealthMetrics, LocationUpdate, NearbyQuery, OverviewOptions, ProductionMetrics,
    RanchBoundaries, RanchOverview, RanchProfile, TrackedEntity,
};
use serde_json::{Map, Value};

/// Endpoint paths, relative to the configured base URL.
pub mod paths {
    pub const CATTLE: &str = "/cattle";
    pub const CATTLE_NEARBY: &str = "/cattle/nearby";
    pub const CATTLE_BY_AREA: &str = "/cattle/by-area";
    pub const CATTLE_STATS: &str = "/cattle/stats";
    pub const PING: &str = "/ping";
    pub const RANCH_OVERVIEW: &str = "/maps/ranch-overview";
    pub const RANCH_BOUNDARIES: &str = "/maps/ranch-boundaries";
    pub const CATTLE_LOCATIONS: &str = "/maps/cattle-locations";
    pub const RANCH_PROFILE: &str = "/ranch/profile";
    pub const DASHBOARD_OVERVIEW: &str = "/dashboard/overview";
    pub const PRODUCTION_METRICS: &str = "/dashboard/production-metrics";
    pub const HEALTH_METRICS: &str = "/dashboard/health-metrics";

    pub fn cattle(id: &str) -> String {
        format!("{CATTLE}/{id}")
    }

    pub fn cattle_location(id: &str) -> String {
        format!("{CATTLE}/{id}/location")
    }
}

/// The ranch backend, seen through a [`ResilientClient`].
#[derive(Debug, Clone)]
pub struct RanchApi {
    client: ResilientClient,
}

impl RanchApi {
    pub fn new(client: ResilientClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ResilientClient {
        &self.client
    }

    // ── Cattle CRUD ──────────────────────────────────────────────

    pub async fn list_cattle(&self) -> ClientResult<Vec<TrackedEntity>> {
        self.client.execute_json(&RequestSpec::get(paths::CATTLE)).await
    }

    pub async fn create_cattle(&self, fields: &CattleFields) -> ClientResult<TrackedEntity> {
        let spec = RequestSpec::post(paths::CATTLE).json(fields)?;
        self.client.execute_json(&spec).await
    }

    pub async fn update_cattle(
        &self,
        id: &EntityId,
        changes: &Map<String, Value>,
    ) -> ClientResult<TrackedEntity> {
        let spec = RequestSpec::put(paths::cattle(&id.to_string())).json(changes)?;
        self.client.execute_json(&spec).await
    }

    pub async fn delete_cattle(&self, id: &EntityId) -> ClientResult<()> {
        let spec = RequestSpec::delete(paths::cattle(&id.to_string()));
        self.client.execute_unit(&spec).await
    }

    /// Replaces the animal's location wholesale.
    pub async fn update_location(
        &self,
        id: &EntityId,
        update: &LocationUpdate,
    ) -> ClientResult<TrackedEntity> {
        let spec = RequestSpec::put(paths::cattle_location(&id.to_string())).json(update)?;
        self.client.execute_json(&spec).await
    }

    // ── Spatial queries ──────────────────────────────────────────

    pub async fn nearby(&self, query: &NearbyQuery) -> ClientResult<Vec<CattleLocation>> {
        let spec = RequestSpec::get(paths::CATTLE_NEARBY).queries(query.to_query());
        self.client.execute_json(&spec).await
    }

    pub async fn by_area(&self, area: &BoundingBox) -> ClientResult<Vec<CattleLocation>> {
        let spec = RequestSpec::get(paths::CATTLE_BY_AREA).queries(area_query(area));
        self.client.execute_json(&spec).await
    }

    pub async fn cattle_stats(&self) -> ClientResult<CattleStats> {
        self.client
            .execute_json(&RequestSpec::get(paths::CATTLE_STATS))
            .await
    }

    /// Liveness check; any 2xx counts.
    pub async fn ping(&self) -> ClientResult<()> {
        self.client.execute(&RequestSpec::get(paths::PING)).await.map(|_| ())
    }

    // ── Maps ─────────────────────────────────────────────────────

    pub async fn ranch_overview(&self, options: &OverviewOptions) -> ClientResult<RanchOverview> {
        let spec = RequestSpec::get(paths::RANCH_OVERVIEW).queries(options.to_query());
        self.client.execute_json(&spec).await
    }

    pub async fn ranch_boundaries(&self) -> ClientResult<RanchBoundaries> {
        self.client
            .execute_json(&RequestSpec::get(paths::RANCH_BOUNDARIES))
            .await
    }

    pub async fn cattle_locations(&self) -> ClientResult<Vec<CattleLocation>> {
        self.client
            .execute_json(&RequestSpec::get(paths::CATTLE_LOCATIONS))
            .await
    }

    // ── Ranch profile ────────────────────────────────────────────

    pub async fn ranch_profile(&self) -> ClientResult<RanchProfile> {
        self.client
            .execute_json(&RequestSpec::get(paths::RANCH_PROFILE))
            .await
    }

    pub async fn update_ranch_profile(&self, profile: &RanchProfile) -> ClientResult<RanchProfile> {
        let spec = RequestSpec::put(paths::RANCH_PROFILE).json(profile)?;
        self.client.execute_json(&spec).await
    }

    // ── Dashboard ────────────────────────────────────────────────

    pub async fn dashboard_overview(&self) -> ClientResult<DashboardOverview> {
        self.client
            .execute_json(&RequestSpec::get(paths::DASHBOARD_OVERVIEW))
            .await
    }

    pub async fn production_metrics(&self) -> ClientResult<ProductionMetrics> {
        self.client
            .execute_json(&RequestSpec::get(paths::PRODUCTION_METRICS))
            .await
    }

    pub async fn health_metrics(&self) -> ClientResult<HealthMetrics> {
        self.client
            .execute_json(&RequestSpec::get(paths::HEALTH_METRICS))
            .await
    }
}
