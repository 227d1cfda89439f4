// Read-through content cache
// Author: kelexine (https://github.com/kelexine)

use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::keys::{file_key, metadata_key};
use super::models::{CacheStats, CachedValue, FileContent, FileMetadata};
use super::store::KeyValueStore;
use crate::error::Result;
use crate::metrics;

enum Lookup {
    Hit,
    Miss,
    Bypass,
}

/// Return the present value under `key`, or fetch, store and return a new one.
async fn read_through<F, Fut>(
    store: &dyn KeyValueStore,
    key: &str,
    fetch: F,
) -> Result<(CachedValue, Lookup)>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<CachedValue>>,
{
    if let Some(value) = store.get_item(key).await? {
        if value.is_present() {
            debug!("Cache hit: {}", key);
            return Ok((value, Lookup::Hit));
        }
    }

    debug!("Cache miss: {}", key);
    let value = fetch().await?;
    store.set_item(key, value.clone()).await?;
    Ok((value, Lookup::Miss))
}

async fn lookup_file<F, Fut>(
    id: Option<&str>,
    fetch_content: F,
    store: &dyn KeyValueStore,
    is_text: bool,
) -> Result<(FileContent, Lookup)>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<FileContent>>,
{
    let Some(id) = id else {
        debug!("No content id, bypassing cache");
        return Ok((fetch_content().await?, Lookup::Bypass));
    };

    let key = file_key(id, is_text);
    let (value, lookup) = read_through(store, &key, move || async move {
        fetch_content().await.map(CachedValue::from)
    })
    .await?;
    Ok((FileContent::try_from(value)?, lookup))
}

async fn lookup_metadata<F, Fut>(
    id: &str,
    fetch_metadata: F,
    store: &dyn KeyValueStore,
) -> Result<(FileMetadata, Lookup)>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<FileMetadata>>,
{
    let key = metadata_key(id);
    let (value, lookup) = read_through(store, &key, move || async move {
        fetch_metadata().await.map(CachedValue::from)
    })
    .await?;
    Ok((FileMetadata::try_from(value)?, lookup))
}

/// Read file content through `store`.
///
/// Without an `id` the content is always fetched and never stored. Otherwise
/// text lives under `gh.<id>` and binary content under `gh.<id>.blob`.
pub async fn read_file<F, Fut>(
    id: Option<&str>,
    fetch_content: F,
    store: &dyn KeyValueStore,
    is_text: bool,
) -> Result<FileContent>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<FileContent>>,
{
    let (content, _) = lookup_file(id, fetch_content, store, is_text).await?;
    Ok(content)
}

/// Read file metadata through `store` under `gh.<id>.meta`.
pub async fn read_file_metadata<F, Fut>(
    id: &str,
    fetch_metadata: F,
    store: &dyn KeyValueStore,
) -> Result<FileMetadata>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<FileMetadata>>,
{
    let (metadata, _) = lookup_metadata(id, fetch_metadata, store).await?;
    Ok(metadata)
}

/// Read-through cache over a shared store, with hit/miss accounting.
#[derive(Clone)]
pub struct ContentCache {
    store: Arc<dyn KeyValueStore>,
    stats: Arc<RwLock<CacheStats>>,
}

impl ContentCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            stats: Arc::new(RwLock::new(CacheStats::default())),
        }
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// See [`read_file`].
    pub async fn read_file<F, Fut>(
        &self,
        id: Option<&str>,
        fetch_content: F,
        is_text: bool,
    ) -> Result<FileContent>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<FileContent>>,
    {
        let (content, lookup) = lookup_file(id, fetch_content, self.store(), is_text).await?;
        self.record(lookup, if is_text { "text" } else { "blob" }).await;
        Ok(content)
    }

    /// See [`read_file_metadata`].
    pub async fn read_file_metadata<F, Fut>(&self, id: &str, fetch_metadata: F) -> Result<FileMetadata>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<FileMetadata>>,
    {
        let (metadata, lookup) = lookup_metadata(id, fetch_metadata, self.store()).await?;
        self.record(lookup, "meta").await;
        Ok(metadata)
    }

    async fn record(&self, lookup: Lookup, kind: &str) {
        let mut stats = self.stats.write().await;
        match lookup {
            Lookup::Hit => {
                stats.hits += 1;
                metrics::record_cache_hit(kind);
            }
            Lookup::Miss => {
                stats.misses += 1;
                metrics::record_cache_miss(kind);
            }
            Lookup::Bypass => {
                stats.bypasses += 1;
                metrics::record_cache_bypass(kind);
            }
        }
    }

    /// Get cache statistics
    pub async fn get_stats(&self) -> CacheStats {
        self.stats.read().await.clone()
    }
}
