//! Configuration file for the `corral` binary.

use anyhow::{Context, Result};
use corral_client::{
    ClientResult, ClientConfig, CredentialSource, EnvCredentials, FileCredentialStore,
    ResilientClient,
};
use corral_map::MapConfig;
use corral_sync::HealthConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Everything the binary wires together. Every section may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CorralConfig {
    pub client: ClientConfig,
    pub health: HealthConfig,
    pub map: MapConfig,
    pub credentials: CredentialConfig,
}

impl CorralConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reads `path` when given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.client.base_url = url;
        }
        self
    }

    /// Builds the HTTP client with the configured credentials.
    pub fn client(&self) -> Result<ResilientClient> {
        ResilientClient::new(self.client.clone(), self.credentials.source())
            .context("Invalid client configuration")
    }
}

/// Where the bearer token comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CredentialConfig {
    /// File written by `corral token set`.
    pub token_file: PathBuf,
    /// Environment variable that takes precedence over the file when set.
    pub token_env: Option<String>,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            token_file: PathBuf::from(".corral/token"),
            token_env: Some("CORRAL_TOKEN".to_string()),
        }
    }
}

impl CredentialConfig {
    pub fn store(&self) -> FileCredentialStore {
        FileCredentialStore::new(&self.token_file)
    }

    pub fn source(&self) -> Arc<dyn CredentialSource> {
        Arc::new(LayeredCredentials {
            env: self.token_env.as_deref().map(EnvCredentials::new),
            file: self.store(),
        })
    }
}

/// Environment token first, then the token file.
#[derive(Debug, Clone)]
pub struct LayeredCredentials {
    env: Option<EnvCredentials>,
    file: FileCredentialStore,
}

impl CredentialSource for LayeredCredentials {
    fn token(&self) -> ClientResult<Option<String>> {
        if let Some(env) = &self.env {
            if let Some(token) = env.token()? {
                return Ok(Some(token));
            }
        }
        self.file.token()
    }
}
