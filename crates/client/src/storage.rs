//! Persisted client token.
//!
//! Exactly one token string is kept, under [`TOKEN_KEY`].

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use anyhow::Context;

use crate::error::ClientError;

/// Well-known key the token is stored under.
pub const TOKEN_KEY: &str = "token";

/// Where the client keeps its bearer token between runs.
pub trait TokenStorage: Send + Sync {
    fn load(&self) -> Result<Option<String>, ClientError>;

    fn save(&self, token: &str) -> Result<(), ClientError>;

    /// Remove the token. Removing an absent token is not an error.
    fn clear(&self) -> Result<(), ClientError>;
}

#[derive(Debug, Default)]
pub struct InMemoryTokenStorage {
    token: RwLock<Option<String>>,
}

impl InMemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

fn poisoned<T>(_: T) -> ClientError {
    ClientError::Storage("token lock poisoned".to_string())
}

impl TokenStorage for InMemoryTokenStorage {
    fn load(&self) -> Result<Option<String>, ClientError> {
        Ok(self.token.read().map_err(poisoned)?.clone())
    }

    fn save(&self, token: &str) -> Result<(), ClientError> {
        *self.token.write().map_err(poisoned)? = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        *self.token.write().map_err(poisoned)? = None;
        Ok(())
    }
}

/// Token kept in a file named [`TOKEN_KEY`].
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `{app_data_dir}/rbac-demo/token`, creating the directory if needed.
    pub fn in_data_dir() -> anyhow::Result<Self> {
        let base = dirs::data_dir()
            .or_else(|| dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            }))
            .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

        let mut dir = base;
        dir.push("rbac-demo");
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;

        dir.push(TOKEN_KEY);
        Ok(Self::new(dir))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn io_error(path: &Path, err: std::io::Error) -> ClientError {
    ClientError::Storage(format!("{}: {}", path.display(), err))
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Result<Option<String>, ClientError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&self.path, e)),
        }
    }

    fn save(&self, token: &str) -> Result<(), ClientError> {
        std::fs::write(&self.path, token).map_err(|e| io_error(&self.path, e))
    }

    fn clear(&self) -> Result<(), ClientError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&self.path, e)),
        }
    }
}
