//! Connection health monitor.
//!
//! Probes `GET /ping` once on start and then on a fixed interval. The result
//! is published as a [`ConnectionStatus`] on a watch channel; the monitor is
//! the only writer.

use chrono::{DateTime, Utc};
use corral_client::{RequestSpec, ResilientClient, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Configuration for the health monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HealthConfig {
    /// Time between scheduled probes.
    pub interval_ms: u64,
    /// Deadline for a single probe.
    pub probe_timeout_ms: u64,
    pub ping_path: String,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            interval_ms: 30_000,
            probe_timeout_ms: 10_000,
            ping_path: "/ping".to_string(),
        }
    }
}

impl HealthConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

/// Where the monitor is in its probe cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorState {
    Idle,
    Probing,
    Connected,
    Disconnected,
}

/// Backend reachability as last observed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub is_connected: bool,
    /// When the last probe resolved.
    pub last_check: Option<DateTime<Utc>>,
    /// Latency of the last probe, success or failure.
    pub latency_ms: u64,
    /// A probe is in flight.
    pub retrying: bool,
}

impl ConnectionStatus {
    pub fn state(&self) -> MonitorState {
        if self.retrying {
            MonitorState::Probing
        } else if self.last_check.is_none() {
            MonitorState::Idle
        } else if self.is_connected {
            MonitorState::Connected
        } else {
            MonitorState::Disconnected
        }
    }

    /// Returns true once a probe has resolved and found the backend down.
    pub fn is_offline(&self) -> bool {
        self.last_check.is_some() && !self.is_connected
    }
}

/// Result of one completed probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeReport {
    pub connected: bool,
    pub latency_ms: u64,
}

/// Shared by the monitor and its interval task.
struct Prober {
    client: ResilientClient,
    ping: RequestSpec,
    status: watch::Sender<ConnectionStatus>,
}

/// Resets `retrying` if a probe is dropped before it resolves.
struct InFlight<'a> {
    status: &'a watch::Sender<ConnectionStatus>,
    done: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.done {
            self.status.send_modify(|s| s.retrying = false);
        }
    }
}

impl Prober {
    async fn probe(&self) -> Option<ProbeReport> {
        let claimed = self.status.send_if_modified(|s| {
            if s.retrying {
                false
            } else {
                s.retrying = true;
                true
            }
        });
        if !claimed {
            debug!("Probe already in flight, skipping");
            return None;
        }
        let mut in_flight = InFlight {
            status: &self.status,
            done: false,
        };

        let started = Instant::now();
        let result = self.client.execute(&self.ping).await;
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let connected = result.is_ok();

        match &result {
            Ok(_) => debug!("Backend reachable ({latency_ms}ms)"),
            Err(e) => warn!("Backend unreachable after {latency_ms}ms: {e}"),
        }

        let was_connected = self.status.borrow().is_connected;
        self.status.send_modify(|s| {
            s.is_connected = connected;
            s.latency_ms = latency_ms;
            s.last_check = Some(Utc::now());
            s.retrying = false;
        });
        in_flight.done = true;

        if was_connected != connected {
            info!(
                "Connection {}",
                if connected { "restored" } else { "lost" }
            );
        }
        Some(ProbeReport {
            connected,
            latency_ms,
        })
    }
}

/// Periodically probes backend liveness.
pub struct HealthMonitor {
    prober: Arc<Prober>,
    config: HealthConfig,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl HealthMonitor {
    /// Creates a monitor probing through a copy of `client` that has the
    /// probe deadline and no retries.
    pub fn new(client: &ResilientClient, config: HealthConfig) -> Self {
        let client = client.with_policy(RetryPolicy {
            timeout_ms: config.probe_timeout_ms,
            max_retries: 0,
            retry_delay_ms: 0,
        });
        let (status, _) = watch::channel(ConnectionStatus::default());
        Self {
            prober: Arc::new(Prober {
                client,
                ping: RequestSpec::get(config.ping_path.clone()),
                status,
            }),
            config,
            task: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &HealthConfig {
        &self.config
    }

    /// Read-only view of the status.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.prober.status.subscribe()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.prober.status.borrow().clone()
    }

    pub fn state(&self) -> MonitorState {
        self.prober.status.borrow().state()
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .map(|t| t.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    /// Starts probing: once immediately, then every `interval_ms`.
    /// Calling it again while running does nothing.
    pub fn start(&self) {
        let Ok(mut task) = self.task.lock() else {
            return;
        };
        if task.as_ref().is_some_and(|h| !h.is_finished()) {
            return;
        }

        let prober = Arc::clone(&self.prober);
        let period = self.config.interval();
        *task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                prober.probe().await;
            }
        }));
        info!("Health monitor started ({}ms interval)", self.config.interval_ms);
    }

    /// Probes now. Returns `None` without probing if a probe is in flight.
    pub async fn check_now(&self) -> Option<ProbeReport> {
        self.prober.probe().await
    }

    /// Stops the interval task; no probe fires afterwards.
    pub fn shutdown(&self) {
        if let Ok(mut task) = self.task.lock() {
            if let Some(handle) = task.take() {
                handle.abort();
                info!("Health monitor stopped");
            }
        }
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for HealthMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthMonitor")
            .field("config", &self.config)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}
