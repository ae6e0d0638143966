//! Resilient HTTP client for the Corral ranch backend.
//!
//! Every backend call goes through [`ResilientClient::execute`], which:
//! - bounds each attempt with a hard deadline (`timeout_ms`);
//! - retries transport failures (refused connection, DNS, aborted exchange)
//!   up to `max_retries` times with a fixed `retry_delay_ms` between attempts;
//! - never retries a timeout or a received non-2xx response;
//! - injects `Authorization: Bearer <token>` from a [`CredentialSource`].
//!
//! [`RanchApi`] layers typed endpoint calls on top and unwraps the
//! `{ success, data, message }` envelope.
//!
//! # Example
//!
//! ```no_run
//! use corral_client::{ClientConfig, RanchApi, ResilientClient};
//!
//! # async fn run() -> corral_client::ClientResult<()> {
//! let client = ResilientClient::anonymous(ClientConfig::new("http://localhost:5000/api"))?;
//! let api = RanchApi::new(client);
//! let herd = api.list_cattle().await?;
//! println!("{} animals", herd.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
mod client;
mod config;
pub mod credentials;
mod error;
mod request;
pub mod transport;

pub use api::RanchApi;
pub use client::{RequestOutcome, ResilientClient};
pub use config::{ClientConfig, RetryPolicy};
pub use credentials::{CredentialSource, EnvCredentials, FileCredentialStore, StaticCredentials};
pub use error::{ClientError, ClientResult};
pub use request::{Method, RequestSpec};
pub use transport::{
    FailureKind, HttpTransport, PreparedRequest, RawResponse, ReqwestTransport, TransportFailure,
};
