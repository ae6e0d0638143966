//! Transport layer abstraction.
//!
//! The resilient client owns the deadline and retry policy; a transport only
//! performs one exchange and classifies how it failed. `ReqwestTransport` is
//! the real one, [`mock::ScriptedTransport`] replays canned outcomes.

use crate::request::Method;
use async_trait::async_trait;
use corral_types::EnvelopeMessage;
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// A fully resolved request: absolute URL and final headers.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl PreparedRequest {
    /// First header value for `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A response that arrived, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Message for an error response: envelope `message`, else the body text,
    /// else the canonical reason phrase.
    pub fn error_message(&self) -> String {
        if let Some(message) = EnvelopeMessage::from_body(&self.body) {
            return message;
        }
        let text = self.body.trim();
        if !text.is_empty() {
            return text.to_string();
        }
        reqwest::StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("unknown status")
            .to_string()
    }
}

/// How a transport exchange failed before any response arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    ConnectionRefused,
    Dns,
    Aborted,
    Other,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailureKind::ConnectionRefused => "connection refused",
            FailureKind::Dns => "dns failure",
            FailureKind::Aborted => "aborted",
            FailureKind::Other => "transport failure",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct TransportFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl TransportFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn refused(message: impl Into<String>) -> Self {
        Self::new(FailureKind::ConnectionRefused, message)
    }
}

/// Performs a single HTTP exchange.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, TransportFailure>;
}

/// Transport backed by `reqwest`.
///
/// No timeout is configured on the inner client: the deadline belongs to the
/// resilient client, which drops this future when it expires.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn classify(err: &reqwest::Error) -> FailureKind {
        let mut source = std::error::Error::source(err);
        while let Some(cause) = source {
            let text = cause.to_string().to_ascii_lowercase();
            if text.contains("dns") || text.contains("failed to lookup") {
                return FailureKind::Dns;
            }
            source = cause.source();
        }
        if err.is_connect() {
            FailureKind::ConnectionRefused
        } else if err.is_request() || err.is_body() || err.is_timeout() {
            FailureKind::Aborted
        } else {
            FailureKind::Other
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, TransportFailure> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await.map_err(|e| {
            let kind = Self::classify(&e);
            debug!("{} {} failed: {kind}: {e}", request.method, request.url);
            TransportFailure::new(kind, e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportFailure::new(FailureKind::Aborted, e.to_string()))?;

        Ok(RawResponse { status, body })
    }
}

/// A scripted transport for tests.
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
    use std::time::Duration;

    fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// One canned outcome.
    #[derive(Debug, Clone)]
    pub enum Step {
        /// Respond with a status and body.
        Respond(RawResponse),
        /// Fail before any response.
        Fail(TransportFailure),
        /// Never resolve.
        Hang,
        /// Wait, then play the inner step.
        Delay(Duration, Box<Step>),
    }

    impl Step {
        /// `200` with `{ success: true, data }`.
        pub fn ok(data: Value) -> Self {
            Step::Respond(RawResponse::new(
                200,
                serde_json::json!({ "success": true, "data": data }).to_string(),
            ))
        }

        /// A status with an envelope carrying `message`.
        pub fn error(status: u16, message: &str) -> Self {
            Step::Respond(RawResponse::new(
                status,
                serde_json::json!({ "success": false, "message": message }).to_string(),
            ))
        }

        pub fn refused() -> Self {
            Step::Fail(TransportFailure::refused("connection refused (scripted)"))
        }

        pub fn after(delay: Duration, step: Step) -> Self {
            Step::Delay(delay, Box::new(step))
        }
    }

    /// Replays steps in order and records every request it was sent.
    ///
    /// Once the script runs out, `fallback` is played for every further call.
    #[derive(Debug, Clone)]
    pub struct ScriptedTransport {
        steps: Arc<Mutex<VecDeque<Step>>>,
        fallback: Arc<Mutex<Step>>,
        sent: Arc<Mutex<Vec<PreparedRequest>>>,
    }

    impl Default for ScriptedTransport {
        fn default() -> Self {
            Self::new(Vec::new())
        }
    }

    impl ScriptedTransport {
        pub fn new(steps: Vec<Step>) -> Self {
            Self {
                steps: Arc::new(Mutex::new(steps.into())),
                fallback: Arc::new(Mutex::new(Step::ok(Value::Null))),
                sent: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Plays `step` for every call once the script is exhausted.
        pub fn with_fallback(self, step: Step) -> Self {
            *locked(&self.fallback) = step;
            self
        }

        /// Appends a step to the script.
        pub fn push(&self, step: Step) {
            locked(&self.steps).push_back(step);
        }

        /// Requests received so far.
        pub fn sent(&self) -> Vec<PreparedRequest> {
            locked(&self.sent).clone()
        }

        pub fn call_count(&self) -> usize {
            locked(&self.sent).len()
        }

        fn next_step(&self) -> Step {
            let next = locked(&self.steps).pop_front();
            next.unwrap_or_else(|| locked(&self.fallback).clone())
        }

        async fn play(step: Step) -> Result<RawResponse, TransportFailure> {
            let mut step = step;
            loop {
                match step {
                    Step::Respond(response) => return Ok(response),
                    Step::Fail(failure) => return Err(failure),
                    Step::Hang => std::future::pending::<()>().await,
                    Step::Delay(delay, inner) => {
                        tokio::time::sleep(delay).await;
                        step = *inner;
                    }
                }
            }
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn send(&self, request: PreparedRequest) -> Result<RawResponse, TransportFailure> {
            locked(&self.sent).push(request);
            let step = self.next_step();
            Self::play(step).await
        }
    }
}
