use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

/// Key under which the session token is persisted.
pub const TOKEN_KEY: &str = "token";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("store file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Persistent string store addressed by key.
#[async_trait]
pub trait SecureStore: Send + Sync {
    async fn save(&self, key: &str, value: &str) -> Result<(), StoreError>;
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// JSON file on disk holding `{ key: value }`.
///
/// Writes land in a sibling temp file that is then renamed over the target,
/// so readers see either the old map or the new one.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn read_map(&self) -> Result<HashMap<String, String>, StoreError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(HashMap::new());
        }
        serde_json::from_slice(&raw).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Map to modify before a write. A corrupt file is discarded so the
    /// next write replaces it; the flag reports that it happened.
    async fn writable_map(&self) -> Result<(HashMap<String, String>, bool), StoreError> {
        match self.read_map().await {
            Ok(map) => Ok((map, false)),
            Err(StoreError::Corrupt { path, source }) => {
                warn!(path = %path.display(), error = %source, "store file is corrupt, starting over");
                Ok((HashMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    async fn write_map(&self, map: &HashMap<String, String>) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let body = serde_json::to_vec(map).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        let tmp = self.path.with_extension("tmp");
        write_private(&tmp, &body).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)?;
        Ok(())
    }
}

#[cfg(unix)]
async fn write_private(path: &Path, body: &[u8]) -> std::io::Result<()> {
    use tokio::io::AsyncWriteExt;

    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
        .await?;
    file.write_all(body).await?;
    file.sync_all().await
}

#[cfg(not(unix))]
async fn write_private(path: &Path, body: &[u8]) -> std::io::Result<()> {
    tokio::fs::write(path, body).await
}

#[async_trait]
impl SecureStore for FileStore {
    async fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let (mut map, _) = self.writable_map().await?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map).await?;
        debug!(key, path = %self.path.display(), "store item saved");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map().await?;
        Ok(map.remove(key))
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let (mut map, reset) = self.writable_map().await?;
        if map.remove(key).is_none() && !reset {
            return Ok(());
        }
        self.write_map(&map).await?;
        debug!(key, path = %self.path.display(), "store item deleted");
        Ok(())
    }
}

/// Process-local store, used by tests and embedders without a filesystem.
#[derive(Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SecureStore for MemoryStore {
    async fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        if self.items.write().await.remove(key).is_none() {
            debug!(key, "delete of absent key");
        }
        Ok(())
    }
}
