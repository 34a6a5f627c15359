//! Credential stores.
//!
//! The gate only reads tokens; they are written by the authorization
//! exchange path.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::debug;

use super::error::AuthError;
use super::token::AccessToken;

/// Storage for the single cached access token.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read the cached token, if any.
    async fn get(&self) -> Result<Option<AccessToken>, AuthError>;

    /// Replace the cached token.
    async fn set(&self, token: AccessToken) -> Result<(), AuthError>;

    /// Forget the cached token.
    async fn clear(&self) -> Result<(), AuthError>;
}

/// Process-local token cache.
///
/// ```rust
/// use spotify_mcp_server::domains::auth::{CredentialStore, MemoryCredentialStore};
///
/// # tokio_test::block_on(async {
/// let store = MemoryCredentialStore::new();
/// assert!(store.get().await.unwrap().is_none());
/// # });
/// ```
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<AccessToken>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a token.
    pub fn with_token(token: AccessToken) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self) -> Result<Option<AccessToken>, AuthError> {
        Ok(self.token.read().await.clone())
    }

    async fn set(&self, token: AccessToken) -> Result<(), AuthError> {
        *self.token.write().await = Some(token);
        Ok(())
    }

    async fn clear(&self) -> Result<(), AuthError> {
        *self.token.write().await = None;
        Ok(())
    }
}

/// Token cache persisted as a JSON file, surviving restarts.
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
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self) -> Result<Option<AccessToken>, AuthError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AuthError::store(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| AuthError::store(format!("Corrupt token cache: {}", e)))
    }

    async fn set(&self, token: AccessToken) -> Result<(), AuthError> {
        let content = serde_json::to_string_pretty(&token)
            .map_err(|e| AuthError::store(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AuthError::store(e.to_string()))?;
        }

        tokio::fs::write(&self.path, content).await.map_err(|e| {
            AuthError::store(format!("Failed to write {}: {}", self.path.display(), e))
        })?;

        debug!("Token cache written to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<(), AuthError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::store(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn sample_token() -> AccessToken {
        AccessToken {
            access_token: "token-1".to_string(),
            token_type: "Bearer".to_string(),
            scope: Some("user-modify-playback-state".to_string()),
            refresh_token: None,
            expires_at: Utc::now() + Duration::hours(1),
        }
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryCredentialStore::new();
        assert!(store.get().await.unwrap().is_none());

        store.set(sample_token()).await.unwrap();
        let token = store.get().await.unwrap().unwrap();
        assert_eq!(token.access_token, "token-1");

        store.clear().await.unwrap();
        assert!(store.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(temp_dir.path().join("token.json"));
        assert!(store.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_persists_token() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cache").join("token.json");

        let store = FileCredentialStore::new(&path);
        store.set(sample_token()).await.unwrap();
        assert!(path.exists());

        // A second store over the same file sees the token.
        let reopened = FileCredentialStore::new(&path);
        let token = reopened.get().await.unwrap().unwrap();
        assert_eq!(token.access_token, "token-1");
        assert!(token.is_valid());

        reopened.clear().await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_file_store_corrupt_cache() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("token.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileCredentialStore::new(&path);
        assert!(matches!(store.get().await, Err(AuthError::Store(_))));
    }
}
