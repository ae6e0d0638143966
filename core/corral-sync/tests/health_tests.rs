use corral_client::transport::mock::{ScriptedTransport, Step};
use corral_client::{ClientConfig, ResilientClient, StaticCredentials};
use corral_sync::{HealthConfig, HealthMonitor, MonitorState};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn monitor_with(transport: &ScriptedTransport, config: HealthConfig) -> HealthMonitor {
    let client = ResilientClient::with_transport(
        ClientConfig::new("http://ranch.test/api"),
        Arc::new(transport.clone()),
        Arc::new(StaticCredentials::anonymous()),
    )
    .unwrap();
    HealthMonitor::new(&client, config)
}

#[tokio::test(start_paused = true)]
async fn unresolved_ping_reports_disconnected_at_deadline() {
    let transport = ScriptedTransport::new(vec![Step::Hang]);
    let monitor = monitor_with(&transport, HealthConfig::default());
    assert_eq!(monitor.state(), MonitorState::Idle);

    let report = monitor.check_now().await.unwrap();

    assert!(!report.connected);
    assert!(
        (10_000..10_005).contains(&report.latency_ms),
        "latency {}",
        report.latency_ms
    );
    let status = monitor.status();
    assert!(!status.is_connected);
    assert!(!status.retrying);
    assert!(status.last_check.is_some());
    assert_eq!(status.latency_ms, report.latency_ms);
    assert_eq!(monitor.state(), MonitorState::Disconnected);
    // Probes never retry.
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn successful_ping_measures_latency() {
    let transport = ScriptedTransport::new(vec![Step::after(
        Duration::from_millis(120),
        Step::ok(json!("pong")),
    )]);
    let monitor = monitor_with(&transport, HealthConfig::default());

    let report = monitor.check_now().await.unwrap();

    assert!(report.connected);
    assert!((120..125).contains(&report.latency_ms));
    assert_eq!(monitor.state(), MonitorState::Connected);
    assert_eq!(transport.sent()[0].url, "http://ranch.test/api/ping");
}

#[tokio::test(start_paused = true)]
async fn failure_response_also_counts_as_disconnected() {
    let transport = ScriptedTransport::new(vec![Step::error(503, "maintenance")]);
    let monitor = monitor_with(&transport, HealthConfig::default());

    let report = monitor.check_now().await.unwrap();

    assert!(!report.connected);
    assert!(monitor.status().is_offline());
}

#[tokio::test(start_paused = true)]
async fn manual_check_during_probe_is_a_no_op() {
    let transport = ScriptedTransport::new(vec![Step::after(
        Duration::from_millis(100),
        Step::ok(json!(null)),
    )]);
    let monitor = monitor_with(&transport, HealthConfig::default());

    let (first, second, during) = tokio::join!(monitor.check_now(), monitor.check_now(), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        (monitor.state(), monitor.status().retrying)
    });

    assert!(first.is_some());
    assert!(second.is_none());
    assert_eq!(during, (MonitorState::Probing, true));
    assert_eq!(transport.call_count(), 1);
    assert!(!monitor.status().retrying);
}

#[tokio::test(start_paused = true)]
async fn start_probes_immediately_then_every_interval() {
    let transport = ScriptedTransport::default();
    let config = HealthConfig {
        interval_ms: 30_000,
        ..Default::default()
    };
    let monitor = monitor_with(&transport, config);

    monitor.start();
    assert!(monitor.is_running());
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(transport.call_count(), 1);

    tokio::time::sleep(Duration::from_millis(30_000)).await;
    assert_eq!(transport.call_count(), 2);

    // A second start while running does not add a timer.
    monitor.start();
    tokio::time::sleep(Duration::from_millis(30_000)).await;
    assert_eq!(transport.call_count(), 3);

    monitor.shutdown();
    assert!(!monitor.is_running());
    tokio::time::sleep(Duration::from_millis(120_000)).await;
    assert_eq!(transport.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_monitor_stops_probing() {
    let transport = ScriptedTransport::default();
    {
        let monitor = monitor_with(&transport, HealthConfig::default());
        monitor.start();
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    assert_eq!(transport.call_count(), 1);

    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn shutdown_mid_probe_clears_retrying() {
    let transport = ScriptedTransport::new(vec![Step::Hang]);
    let monitor = monitor_with(&transport, HealthConfig::default());
    let mut rx = monitor.subscribe();

    monitor.start();
    rx.changed().await.unwrap();
    assert!(rx.borrow_and_update().retrying);

    monitor.shutdown();
    rx.changed().await.unwrap();
    assert!(!rx.borrow().retrying);
    assert_eq!(monitor.state(), MonitorState::Idle);
}

#[tokio::test(start_paused = true)]
async fn subscribers_see_status_transitions() {
    let transport = ScriptedTransport::new(vec![Step::ok(json!(null)), Step::refused()]);
    let monitor = monitor_with(&transport, HealthConfig::default());
    let rx = monitor.subscribe();

    monitor.check_now().await;
    assert!(rx.borrow().is_connected);

    monitor.check_now().await;
    assert!(!rx.borrow().is_connected);
    assert_eq!(rx.borrow().state(), MonitorState::Disconnected);
}

#[test]
fn config_defaults_and_partial_json() {
    let defaults = HealthConfig::default();
    assert_eq!(defaults.interval_ms, 30_000);
    assert_eq!(defaults.probe_timeout_ms, 10_000);
    assert_eq!(defaults.ping_path, "/ping");

    let partial: HealthConfig = serde_json::from_str(r#"{ "intervalMs": 5000 }"#).unwrap();
    assert_eq!(partial.interval_ms, 5_000);
    assert_eq!(partial.probe_timeout_ms, 10_000);
}
