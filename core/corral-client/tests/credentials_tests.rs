use corral_client::{
    ClientConfig, ClientError, CredentialSource, EnvCredentials, FileCredentialStore, RetryPolicy,
    StaticCredentials,
};
use pretty_assertions::assert_eq;
use serial_test::serial;
use tempfile::TempDir;

// ── FileCredentialStore ──────────────────────────────────────────

#[test]
fn missing_file_means_no_token() {
    let dir = TempDir::new().unwrap();
    let store = FileCredentialStore::new(dir.path().join("token"));
    assert_eq!(store.token().unwrap(), None);
}

#[test]
fn store_then_read_trims_whitespace() {
    let dir = TempDir::new().unwrap();
    let store = FileCredentialStore::new(dir.path().join("nested/dir/token"));

    store.store("  abc.def.ghi \n").unwrap();

    assert!(store.path().exists());
    assert_eq!(store.token().unwrap(), Some("abc.def.ghi".to_string()));
}

#[test]
fn blank_file_means_no_token() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("token");
    std::fs::write(&path, "\n   \n").unwrap();

    assert_eq!(FileCredentialStore::new(path).token().unwrap(), None);
}

#[test]
fn clear_removes_token_and_tolerates_absence() {
    let dir = TempDir::new().unwrap();
    let store = FileCredentialStore::new(dir.path().join("token"));

    store.store("t").unwrap();
    store.clear().unwrap();
    assert_eq!(store.token().unwrap(), None);

    store.clear().unwrap();
}

#[test]
fn unreadable_path_is_credential_error() {
    let dir = TempDir::new().unwrap();
    // A directory cannot be read as a token file.
    let store = FileCredentialStore::new(dir.path());
    assert!(matches!(store.token(), Err(ClientError::Credential(_))));
}

// ── StaticCredentials / EnvCredentials ──────────────────────────

#[test]
fn static_credentials_can_be_replaced() {
    let creds = StaticCredentials::anonymous();
    assert_eq!(creds.token().unwrap(), None);

    creds.set(Some("fresh".into()));
    assert_eq!(creds.token().unwrap(), Some("fresh".into()));

    creds.set(None);
    assert_eq!(creds.token().unwrap(), None);
}

#[test]
#[serial]
fn env_credentials_read_at_request_time() {
    const VAR: &str = "CORRAL_TEST_TOKEN";
    let creds = EnvCredentials::new(VAR);

    unsafe { std::env::remove_var(VAR) };
    assert_eq!(creds.token().unwrap(), None);

    unsafe { std::env::set_var(VAR, " from-env ") };
    assert_eq!(creds.token().unwrap(), Some("from-env".into()));

    unsafe { std::env::set_var(VAR, "") };
    assert_eq!(creds.token().unwrap(), None);

    unsafe { std::env::remove_var(VAR) };
}

// ── ClientConfig ─────────────────────────────────────────────────

#[test]
fn config_defaults() {
    let config = ClientConfig::default();
    assert_eq!(config.base_url, "http://localhost:5000/api");
    assert_eq!(
        config.policy,
        RetryPolicy {
            timeout_ms: 10_000,
            max_retries: 3,
            retry_delay_ms: 1_000,
        }
    );
    config.validate().unwrap();
}

#[test]
fn config_deserializes_flat_policy() {
    let config: ClientConfig = serde_json::from_str(
        r#"{
            "baseUrl": "https://ranch.example/api",
            "timeoutMs": 2500,
            "maxRetries": 0,
            "retryDelayMs": 0,
            "baseHeaders": { "X-Ranch": "el-roble" }
        }"#,
    )
    .unwrap();

    assert_eq!(config.base_url, "https://ranch.example/api");
    assert_eq!(config.policy.timeout_ms, 2_500);
    assert_eq!(config.policy.max_retries, 0);
    assert_eq!(config.base_headers.get("X-Ranch").map(String::as_str), Some("el-roble"));
}

#[test]
fn config_rejects_bad_scheme_and_headers() {
    assert!(matches!(
        ClientConfig::new("ftp://ranch.example").validate(),
        Err(ClientError::Config(_))
    ));
    assert!(matches!(
        ClientConfig::default().with_header("bad header", "x").validate(),
        Err(ClientError::Config(_))
    ));
    assert!(matches!(
        ClientConfig::default().with_header("X-Ok", "line\nbreak").validate(),
        Err(ClientError::Config(_))
    ));
}

#[test]
fn url_for_joins_without_double_slashes() {
    let config = ClientConfig::new("http://h/api/");
    assert_eq!(config.url_for("/cattle"), "http://h/api/cattle");
    assert_eq!(config.url_for("cattle/1/location"), "http://h/api/cattle/1/location");
}
