//! The resilient client: one call under a deadline and a flat retry policy.

use crate::config::{ClientConfig, RetryPolicy};
use crate::credentials::{CredentialSource, StaticCredentials};
use crate::error::{ClientError, ClientResult};
use crate::request::RequestSpec;
use crate::transport::{HttpTransport, PreparedRequest, RawResponse, ReqwestTransport};
use corral_types::ApiEnvelope;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of a single [`ResilientClient::execute`] call.
pub type RequestOutcome = ClientResult<RawResponse>;

const DEFAULT_HEADERS: [(&str, &str); 2] = [
    ("Content-Type", "application/json"),
    ("Accept", "application/json"),
];

/// Issues requests with a per-attempt deadline, fixed-delay retries of
/// transport failures and bearer credential injection.
///
/// Cheap to clone; clones share the transport and credential source.
#[derive(Clone)]
pub struct ResilientClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn HttpTransport>,
    credentials: Arc<dyn CredentialSource>,
}

impl ResilientClient {
    /// Creates a client over a `reqwest` transport.
    pub fn new(config: ClientConfig, credentials: Arc<dyn CredentialSource>) -> ClientResult<Self> {
        let transport = ReqwestTransport::new()
            .map_err(|e| ClientError::Config(format!("failed to create HTTP client: {e}")))?;
        Self::with_transport(config, Arc::new(transport), credentials)
    }

    /// Creates a client over an arbitrary transport.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
        credentials: Arc<dyn CredentialSource>,
    ) -> ClientResult<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            transport,
            credentials,
        })
    }

    /// A client without credentials.
    pub fn anonymous(config: ClientConfig) -> ClientResult<Self> {
        Self::new(config, Arc::new(StaticCredentials::anonymous()))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn policy(&self) -> RetryPolicy {
        self.config.policy
    }

    /// A clone sharing transport and credentials but using `policy`.
    pub fn with_policy(&self, policy: RetryPolicy) -> Self {
        let mut config = (*self.config).clone();
        config.policy = policy;
        Self {
            config: Arc::new(config),
            transport: Arc::clone(&self.transport),
            credentials: Arc::clone(&self.credentials),
        }
    }

    fn prepare(&self, spec: &RequestSpec) -> ClientResult<PreparedRequest> {
        let mut headers: Vec<(String, String)> = DEFAULT_HEADERS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        for (name, value) in &self.config.base_headers {
            headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
            headers.push((name.clone(), value.clone()));
        }
        if let Some(token) = self.credentials.token()? {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }

        Ok(PreparedRequest {
            method: spec.method,
            url: self.config.url_for(&spec.path),
            query: spec.query.clone(),
            headers,
            body: spec.body.clone(),
        })
    }

    /// Executes `spec`.
    ///
    /// - Each attempt is bounded by `timeout_ms`; expiry drops the attempt and
    ///   yields `Timeout` without retrying.
    /// - A received non-2xx response is `Application` immediately.
    /// - Transport failures are retried up to `max_retries` times, waiting
    ///   `retry_delay_ms` before each retry.
    pub async fn execute(&self, spec: &RequestSpec) -> RequestOutcome {
        let request = self.prepare(spec)?;
        let policy = self.config.policy;
        let what = spec.describe();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            debug!("{what} (attempt {attempt}/{})", policy.max_retries.saturating_add(1));

            let result = tokio::time::timeout(policy.timeout(), self.transport.send(request.clone())).await;

            match result {
                Err(_elapsed) => {
                    warn!("{what} timed out after {}ms", policy.timeout_ms);
                    return Err(ClientError::Timeout {
                        timeout_ms: policy.timeout_ms,
                    });
                }
                Ok(Ok(response)) if response.is_success() => {
                    debug!("{what} -> {}", response.status);
                    return Ok(response);
                }
                Ok(Ok(response)) => {
                    let message = response.error_message();
                    debug!("{what} -> {}: {message}", response.status);
                    return Err(ClientError::Application {
                        status: response.status,
                        message,
                    });
                }
                Ok(Err(failure)) => {
                    if policy.max_retries == 0 {
                        return Err(ClientError::NetworkUnavailable(failure));
                    }
                    if attempt > policy.max_retries {
                        warn!("{what} failed after {attempt} attempts: {failure}");
                        return Err(ClientError::ExhaustedRetries {
                            attempts: attempt,
                            last: failure,
                        });
                    }
                    warn!(
                        "Retrying {what} (retry {attempt}/{}) after {}ms: {failure}",
                        policy.max_retries, policy.retry_delay_ms
                    );
                    tokio::time::sleep(policy.retry_delay()).await;
                }
            }
        }
    }

    /// Executes `spec` and decodes the envelope's `data` as `T`.
    ///
    /// An envelope with `success: false` is an application error carrying the
    /// response status.
    pub async fn execute_json<T: DeserializeOwned>(&self, spec: &RequestSpec) -> ClientResult<T> {
        let response = self.execute(spec).await?;
        let envelope: ApiEnvelope<T> = serde_json::from_str(&response.body)?;
        if !envelope.success {
            return Err(ClientError::Application {
                status: response.status,
                message: envelope
                    .message
                    .unwrap_or_else(|| "request was not successful".to_string()),
            });
        }
        envelope.data.ok_or(ClientError::MissingData)
    }

    /// Executes `spec`, checking only the envelope's `success` flag.
    pub async fn execute_unit(&self, spec: &RequestSpec) -> ClientResult<()> {
        let response = self.execute(spec).await?;
        if response.body.trim().is_empty() {
            return Ok(());
        }
        let envelope: ApiEnvelope<serde_json::Value> = serde_json::from_str(&response.body)?;
        if envelope.success {
            Ok(())
        } else {
            Err(ClientError::Application {
                status: response.status,
                message: envelope
                    .message
                    .unwrap_or_else(|| "request was not successful".to_string()),
            })
        }
    }
}

impl std::fmt::Debug for ResilientClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
