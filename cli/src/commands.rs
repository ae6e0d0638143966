//! The `corral` subcommands, kept free of printing so they can be tested.

use crate::config::CorralConfig;
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use corral_client::RanchApi;
use corral_map::{AgeBucket, LocationPin, Placement, Reconciler, RenderReport, SurfaceFactory};
use corral_sync::{ConnectionStatus, DataSource, FallbackProvider, HealthMonitor, ProbeReport};
use std::path::PathBuf;
use tracing::info;

/// Runs a single `/ping` probe.
pub async fn ping(config: &CorralConfig) -> Result<ProbeReport> {
    let client = config.client()?;
    let monitor = HealthMonitor::new(&client, config.health.clone());
    monitor
        .check_now()
        .await
        .ok_or_else(|| anyhow!("a probe is already in flight"))
}

/// Runs the health monitor, handing every settled status to `on_status`.
///
/// Returns after `count` statuses, or never when `count` is `None`.
pub async fn watch(
    config: &CorralConfig,
    count: Option<usize>,
    mut on_status: impl FnMut(&ConnectionStatus),
) -> Result<()> {
    let client = config.client()?;
    let monitor = HealthMonitor::new(&client, config.health.clone());
    let mut status = monitor.subscribe();
    monitor.start();
    info!("Watching {} every {}ms", config.client.base_url, config.health.interval_ms);

    let mut seen = 0;
    while count.is_none_or(|limit| seen < limit) {
        status
            .changed()
            .await
            .context("health monitor stopped")?;
        let current = status.borrow_and_update().clone();
        if current.retrying {
            continue;
        }
        on_status(&current);
        seen += 1;
    }
    monitor.shutdown();
    Ok(())
}

/// One line of `corral pins`.
#[derive(Debug, Clone, PartialEq)]
pub struct PinRow {
    pub pin: LocationPin,
    pub bucket: AgeBucket,
    pub color: &'static str,
    pub placement: Placement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PinListing {
    pub source: DataSource,
    pub report: RenderReport,
    pub rows: Vec<PinRow>,
}

/// Reads cattle locations (demo data when the backend fails) and lays them
/// out on the simulated map.
pub async fn pins(config: &CorralConfig, now: DateTime<Utc>) -> Result<PinListing> {
    let provider = FallbackProvider::new(RanchApi::new(config.client()?));
    let locations = provider.cattle_locations().await;

    let mut map = Reconciler::open(&SurfaceFactory::simulated_only(), config.map.clone()).await;
    let report = map
        .reconcile_locations(&locations.data, now)
        .context("Failed to lay out pins")?;

    let rows = map
        .surface()
        .markers()
        .into_iter()
        .filter_map(|marker| {
            let pin = map.pin(&marker.pin_id)?.clone();
            Some(PinRow {
                bucket: AgeBucket::of(pin.age(now)),
                color: marker.color,
                placement: marker.placement,
                pin,
            })
        })
        .collect();

    Ok(PinListing {
        source: locations.source,
        report,
        rows,
    })
}

/// Stores `token` in the configured token file.
pub fn token_set(config: &CorralConfig, token: &str) -> Result<PathBuf> {
    let store = config.credentials.store();
    store.store(token).context("Failed to store token")?;
    Ok(store.path().to_path_buf())
}

pub fn token_clear(config: &CorralConfig) -> Result<PathBuf> {
    let store = config.credentials.store();
    store.clear().context("Failed to clear token")?;
    Ok(store.path().to_path_buf())
}
