//! Bearer token sources.
//!
//! The client asks its source for a token on every request, so a token stored
//! after login is picked up without rebuilding the client.

use crate::error::{ClientError, ClientResult};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

/// Supplies the bearer token injected as `Authorization`.
pub trait CredentialSource: Send + Sync {
    /// Returns the current token, or `None` to send the request without one.
    fn token(&self) -> ClientResult<Option<String>>;
}

/// An in-memory token.
#[derive(Debug, Default)]
pub struct StaticCredentials {
    token: RwLock<Option<String>>,
}

impl StaticCredentials {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token),
        }
    }

    /// No token at all.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn set(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = token;
        }
    }
}

impl CredentialSource for StaticCredentials {
    fn token(&self) -> ClientResult<Option<String>> {
        self.token
            .read()
            .map(|t| t.clone())
            .map_err(|_| ClientError::Credential("token lock poisoned".to_string()))
    }
}

/// A token persisted in a file on disk.
///
/// A missing or blank file means "not logged in".
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persists `token`, creating parent directories as needed.
    pub fn store(&self, token: &str) -> ClientResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                ClientError::Credential(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        std::fs::write(&self.path, token.trim())
            .map_err(|e| ClientError::Credential(format!("cannot write {}: {e}", self.path.display())))?;
        debug!("Stored token in {}", self.path.display());
        Ok(())
    }

    /// Removes the stored token. Clearing an absent token is not an error.
    pub fn clear(&self) -> ClientResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::Credential(format!(
                "cannot remove {}: {e}",
                self.path.display()
            ))),
        }
    }
}

impl CredentialSource for FileCredentialStore {
    fn token(&self) -> ClientResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ClientError::Credential(format!(
                "cannot read {}: {e}",
                self.path.display()
            ))),
        }
    }
}

/// A token read from an environment variable at request time.
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    var: String,
}

impl EnvCredentials {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialSource for EnvCredentials {
    fn token(&self) -> ClientResult<Option<String>> {
        Ok(std::env::var(&self.var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }
}
