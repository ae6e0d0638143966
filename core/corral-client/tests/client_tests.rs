use corral_client::transport::mock::{ScriptedTransport, Step};
use corral_client::{
    ClientConfig, ClientError, CredentialSource, FailureKind, Method, RawResponse, RequestSpec,
    ResilientClient, RetryPolicy, StaticCredentials,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn policy(timeout_ms: u64, max_retries: u32, retry_delay_ms: u64) -> RetryPolicy {
    RetryPolicy {
        timeout_ms,
        max_retries,
        retry_delay_ms,
    }
}

fn client_with(
    transport: &ScriptedTransport,
    policy: RetryPolicy,
    token: Option<&str>,
) -> ResilientClient {
    let config = ClientConfig::new("http://ranch.test/api").with_policy(policy);
    ResilientClient::with_transport(
        config,
        Arc::new(transport.clone()),
        Arc::new(StaticCredentials::new(token.map(str::to_string))),
    )
    .unwrap()
}

fn assert_elapsed_near(start: Instant, expected: Duration) {
    let elapsed = start.elapsed();
    assert!(
        elapsed >= expected && elapsed < expected + Duration::from_millis(5),
        "expected ~{expected:?}, got {elapsed:?}"
    );
}

// ── Request preparation ──────────────────────────────────────────

#[tokio::test]
async fn injects_default_headers_and_bearer_token() {
    let transport = ScriptedTransport::new(vec![Step::ok(json!([]))]);
    let client = client_with(&transport, RetryPolicy::default(), Some("t0k"));

    client.execute(&RequestSpec::get("/cattle")).await.unwrap();

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, Method::Get);
    assert_eq!(sent[0].url, "http://ranch.test/api/cattle");
    assert_eq!(sent[0].header("authorization"), Some("Bearer t0k"));
    assert_eq!(sent[0].header("content-type"), Some("application/json"));
    assert_eq!(sent[0].header("accept"), Some("application/json"));
}

#[tokio::test]
async fn omits_authorization_without_token() {
    let transport = ScriptedTransport::new(vec![Step::ok(json!(null))]);
    let client = client_with(&transport, RetryPolicy::default(), None);

    client.execute(&RequestSpec::get("/ping")).await.unwrap();

    assert_eq!(transport.sent()[0].header("Authorization"), None);
}

#[tokio::test]
async fn base_headers_override_defaults() {
    let transport = ScriptedTransport::default();
    let config = ClientConfig::new("http://ranch.test/api/")
        .with_header("Accept", "application/vnd.corral+json")
        .with_header("X-Ranch", "el-roble");
    let client = ResilientClient::with_transport(
        config,
        Arc::new(transport.clone()),
        Arc::new(StaticCredentials::anonymous()),
    )
    .unwrap();

    client.execute(&RequestSpec::get("ping")).await.unwrap();

    let sent = &transport.sent()[0];
    assert_eq!(sent.url, "http://ranch.test/api/ping");
    assert_eq!(sent.header("accept"), Some("application/vnd.corral+json"));
    assert_eq!(sent.header("x-ranch"), Some("el-roble"));
    assert_eq!(
        sent.headers.iter().filter(|(k, _)| k.eq_ignore_ascii_case("accept")).count(),
        1
    );
}

#[tokio::test]
async fn credential_errors_stop_before_the_network() {
    struct Broken;
    impl CredentialSource for Broken {
        fn token(&self) -> corral_client::ClientResult<Option<String>> {
            Err(ClientError::Credential("store unreadable".into()))
        }
    }

    let transport = ScriptedTransport::default();
    let client = ResilientClient::with_transport(
        ClientConfig::default(),
        Arc::new(transport.clone()),
        Arc::new(Broken),
    )
    .unwrap();

    let err = client.execute(&RequestSpec::get("/cattle")).await.unwrap_err();
    assert!(matches!(err, ClientError::Credential(_)));
    assert_eq!(transport.call_count(), 0);
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = ResilientClient::with_transport(
        ClientConfig::new("not a url"),
        Arc::new(ScriptedTransport::default()),
        Arc::new(StaticCredentials::anonymous()),
    )
    .unwrap_err();
    assert!(matches!(err, ClientError::Config(_)));
}

// ── Application errors ───────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn application_error_is_not_retried() {
    let transport = ScriptedTransport::new(vec![Step::error(409, "Ear tag already exists")]);
    let client = client_with(&transport, policy(1_000, 3, 200), None);

    let err = client.execute(&RequestSpec::post("/cattle")).await.unwrap_err();

    match err {
        ClientError::Application { status, message } => {
            assert_eq!(status, 409);
            assert_eq!(message, "Ear tag already exists");
        }
        other => panic!("expected Application, got {other:?}"),
    }
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn server_error_is_not_retried() {
    let transport = ScriptedTransport::new(vec![Step::Respond(RawResponse::new(503, ""))]);
    let client = client_with(&transport, policy(1_000, 3, 200), None);

    let err = client.execute(&RequestSpec::get("/cattle")).await.unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert!(err.to_string().contains("Service Unavailable"));
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn plain_text_error_body_becomes_message() {
    let transport =
        ScriptedTransport::new(vec![Step::Respond(RawResponse::new(502, "bad gateway upstream"))]);
    let client = client_with(&transport, RetryPolicy::default(), None);

    let err = client.execute(&RequestSpec::get("/cattle")).await.unwrap_err();
    assert_eq!(err.to_string(), "server responded 502: bad gateway upstream");
}

// ── Transport retries ────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn transport_failure_then_success_waits_fixed_delay() {
    let transport = ScriptedTransport::new(vec![Step::refused(), Step::refused(), Step::ok(json!(1))]);
    let client = client_with(&transport, policy(1_000, 3, 250), None);

    let start = Instant::now();
    let response = client.execute(&RequestSpec::get("/cattle/stats")).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(transport.call_count(), 3);
    // Two retries, each after the same flat delay.
    assert_elapsed_near(start, Duration::from_millis(500));
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_after_max_retries_failures() {
    let transport = ScriptedTransport::default().with_fallback(Step::refused());
    let client = client_with(&transport, policy(1_000, 3, 100), None);

    let start = Instant::now();
    let err = client.execute(&RequestSpec::get("/cattle")).await.unwrap_err();

    match &err {
        ClientError::ExhaustedRetries { attempts, last } => {
            assert_eq!(*attempts, 4);
            assert_eq!(last.kind, FailureKind::ConnectionRefused);
        }
        other => panic!("expected ExhaustedRetries, got {other:?}"),
    }
    assert!(err.is_transport());
    assert!(err.is_retryable());
    assert_eq!(transport.call_count(), 4);
    assert_elapsed_near(start, Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn zero_retries_fails_immediately_without_delay() {
    let transport = ScriptedTransport::default().with_fallback(Step::refused());
    let client = client_with(&transport, policy(1_000, 0, 5_000), None);

    let start = Instant::now();
    let err = client.execute(&RequestSpec::get("/cattle")).await.unwrap_err();

    assert!(matches!(err, ClientError::NetworkUnavailable(_)));
    assert_eq!(transport.call_count(), 1);
    assert!(start.elapsed() < Duration::from_millis(1));
}

#[tokio::test]
async fn unbounded_retry_budget_logs_attempts() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);
    let transport = ScriptedTransport::new(vec![Step::refused(), Step::ok(json!(1))]);
    let client = client_with(&transport, policy(1_000, u32::MAX, 0), None);

    let response = client.execute(&RequestSpec::get("/ping")).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(transport.call_count(), 2);
}

// ── Deadline ─────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn hanging_call_times_out_at_deadline() {
    let transport = ScriptedTransport::new(vec![Step::Hang]);
    let client = client_with(&transport, policy(500, 3, 100), None);

    let start = Instant::now();
    let err = client.execute(&RequestSpec::get("/ping")).await.unwrap_err();

    assert!(matches!(err, ClientError::Timeout { timeout_ms: 500 }));
    assert_elapsed_near(start, Duration::from_millis(500));
    // Timeouts are never retried.
    assert_eq!(transport.call_count(), 1);
    assert!(!err.is_retryable());
}

#[tokio::test(start_paused = true)]
async fn late_success_is_reported_as_timeout() {
    let transport = ScriptedTransport::new(vec![Step::after(
        Duration::from_millis(600),
        Step::ok(json!({"total": 1})),
    )]);
    let client = client_with(&transport, policy(500, 0, 0), None);

    let start = Instant::now();
    let err = client.execute(&RequestSpec::get("/cattle/stats")).await.unwrap_err();

    assert!(matches!(err, ClientError::Timeout { .. }));
    assert_elapsed_near(start, Duration::from_millis(500));
}

// ── Envelope decoding ────────────────────────────────────────────

#[tokio::test]
async fn execute_json_unwraps_data() {
    let transport = ScriptedTransport::new(vec![Step::ok(json!([1, 2, 3]))]);
    let client = client_with(&transport, RetryPolicy::default(), None);

    let data: Vec<u32> = client.execute_json(&RequestSpec::get("/x")).await.unwrap();
    assert_eq!(data, vec![1, 2, 3]);
}

#[tokio::test]
async fn unsuccessful_envelope_with_2xx_is_application_error() {
    let transport = ScriptedTransport::new(vec![Step::Respond(RawResponse::new(
        200,
        json!({"success": false, "message": "Ranch not configured"}).to_string(),
    ))]);
    let client = client_with(&transport, RetryPolicy::default(), None);

    let err = client
        .execute_json::<serde_json::Value>(&RequestSpec::get("/ranch/profile"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(200));
    assert!(err.is_application());
}

#[tokio::test]
async fn envelope_without_data_is_missing_data() {
    let transport = ScriptedTransport::new(vec![Step::ok(json!(null))]);
    let client = client_with(&transport, RetryPolicy::default(), None);

    let err = client
        .execute_json::<Vec<u32>>(&RequestSpec::get("/x"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::MissingData));
}

#[tokio::test]
async fn undecodable_body_is_serialization_error() {
    let transport =
        ScriptedTransport::new(vec![Step::Respond(RawResponse::new(200, "<html>ok</html>"))]);
    let client = client_with(&transport, RetryPolicy::default(), None);

    let err = client
        .execute_json::<Vec<u32>>(&RequestSpec::get("/x"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Serialization(_)));
    assert!(!err.is_transport());
}

#[tokio::test]
async fn execute_unit_accepts_empty_body() {
    let transport = ScriptedTransport::new(vec![Step::Respond(RawResponse::new(204, ""))]);
    let client = client_with(&transport, RetryPolicy::default(), None);

    client
        .execute_unit(&RequestSpec::delete("/cattle/abc"))
        .await
        .unwrap();
}

#[tokio::test]
async fn with_policy_shares_transport() {
    let transport = ScriptedTransport::new(vec![Step::Hang]);
    let client = client_with(&transport, policy(10_000, 3, 1_000), Some("t"));

    let quick = client.with_policy(policy(10, 0, 0));
    assert_eq!(quick.policy().timeout_ms, 10);
    assert_eq!(client.policy().timeout_ms, 10_000);

    let err = quick.execute(&RequestSpec::get("/ping")).await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout { timeout_ms: 10 }));
    assert_eq!(transport.sent()[0].header("authorization"), Some("Bearer t"));
}
