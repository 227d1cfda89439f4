// Key-value stores backing the content cache
// Author: kelexine (https://github.com/kelexine)

use futures::future::BoxFuture;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::debug;

use super::CachedValue;
use crate::error::{ApiError, Result};

/// Asynchronous string-keyed store.
///
/// Implementations handle their own synchronization; the cache issues
/// independent `get_item`/`set_item` calls without locking around them.
pub trait KeyValueStore: Send + Sync {
    fn get_item<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<CachedValue>>>;
    fn set_item<'a>(&'a self, key: &'a str, value: CachedValue) -> BoxFuture<'a, Result<()>>;
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<String, CachedValue>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.items.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub async fn clear(&self) {
        self.items.write().await.clear();
        debug!("Memory store cleared");
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<CachedValue>>> {
        Box::pin(async move { Ok(self.items.read().await.get(key).cloned()) })
    }

    fn set_item<'a>(&'a self, key: &'a str, value: CachedValue) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            self.items.write().await.insert(key.to_string(), value);
            Ok(())
        })
    }
}

/// Store that keeps one JSON file per key under a directory.
///
/// File names are the hex SHA-256 of the key, so any key is a valid name.
#[derive(Debug, Clone)]
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.directory.join(format!("{}.json", hex::encode(digest)))
    }

    async fn read(&self, key: &str) -> Result<Option<CachedValue>> {
        let path = self.path_for(key);
        let contents = match tokio::fs::read(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ApiError::Store(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let value = serde_json::from_slice(&contents).map_err(|e| {
            ApiError::Store(format!("Corrupt cache entry {}: {}", path.display(), e))
        })?;
        Ok(Some(value))
    }

    async fn write(&self, key: &str, value: CachedValue) -> Result<()> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| {
                ApiError::Store(format!(
                    "Failed to create {}: {}",
                    self.directory.display(),
                    e
                ))
            })?;

        let path = self.path_for(key);
        let contents = serde_json::to_vec(&value)?;

        // Each write gets its own temp file, then renames over the entry, so
        // concurrent writers of one key never share a partial file
        let directory = self.directory.clone();
        let target = path.clone();
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut temp = tempfile::NamedTempFile::new_in(&directory)?;
            temp.write_all(&contents)?;
            temp.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| ApiError::Store(format!("Write task for {} failed: {}", path.display(), e)))?
        .map_err(|e| ApiError::Store(format!("Failed to write {}: {}", path.display(), e)))?;

        debug!("Stored {} at {}", key, path.display());
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<CachedValue>>> {
        Box::pin(self.read(key))
    }

    fn set_item<'a>(&'a self, key: &'a str, value: CachedValue) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.write(key, value))
    }
}
