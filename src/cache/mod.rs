//! Process-wide read cache: memoized per-table snapshots, invalidated
//! wholesale on any successful mutation. No per-row invalidation and no
//! TTL; at this data scale (hundreds to low thousands of rows) the
//! simplicity is the design choice.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};
use thiserror::Error;

use crate::errors::InventoryError;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Cache operation failed: {0}")]
    OperationFailed(String),
}

impl From<CacheError> for InventoryError {
    fn from(err: CacheError) -> Self {
        InventoryError::CacheError(err.to_string())
    }
}

/// Storage contract for cached snapshots. Values are serialized strings;
/// the typed layer above owns the encoding.
#[async_trait::async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
    async fn clear(&self) -> Result<(), CacheError>;
}

/// In-memory cache implementation
#[derive(Debug, Clone, Default)]
pub struct InMemoryCache {
    store: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait::async_trait]
impl CacheBackend for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let store = self
            .store
            .read()
            .map_err(|e| CacheError::OperationFailed(e.to_string()))?;
        Ok(store.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let mut store = self
            .store
            .write()
            .map_err(|e| CacheError::OperationFailed(e.to_string()))?;
        store.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut store = self
            .store
            .write()
            .map_err(|e| CacheError::OperationFailed(e.to_string()))?;
        store.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        let mut store = self
            .store
            .write()
            .map_err(|e| CacheError::OperationFailed(e.to_string()))?;
        store.clear();
        Ok(())
    }
}

/// Read-through snapshot cache over a [`CacheBackend`].
///
/// `get_or_load` returns the memoized rows for a table, loading them once
/// per invalidation cycle; `invalidate_all` drops every snapshot at once.
/// Passed around by value (cheap clone) — never a global.
#[derive(Clone)]
pub struct SnapshotCache {
    backend: Arc<dyn CacheBackend>,
}

impl SnapshotCache {
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryCache::new()))
    }

    /// Returns the cached snapshot for `table`, or runs `loader` and
    /// memoizes its result.
    pub async fn get_or_load<T, F, Fut>(
        &self,
        table: &str,
        loader: F,
    ) -> Result<Vec<T>, InventoryError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, InventoryError>>,
    {
        if let Some(cached) = self.backend.get(table).await? {
            let rows = serde_json::from_str(&cached)
                .map_err(|e| InventoryError::CacheError(e.to_string()))?;
            return Ok(rows);
        }

        let rows = loader().await?;
        let encoded =
            serde_json::to_string(&rows).map_err(|e| InventoryError::CacheError(e.to_string()))?;
        self.backend.set(table, &encoded).await?;
        Ok(rows)
    }

    /// Drops every cached snapshot. Called after each successful mutation.
    pub async fn invalidate_all(&self) -> Result<(), InventoryError> {
        self.backend.clear().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_or_load_memoizes_until_invalidated() {
        let cache = SnapshotCache::in_memory();

        let first: Vec<String> = cache
            .get_or_load("devices", || async { Ok(vec!["SN-1".to_string()]) })
            .await
            .expect("load");
        assert_eq!(first, vec!["SN-1".to_string()]);

        // Second read must come from the cache, not the loader.
        let second: Vec<String> = cache
            .get_or_load("devices", || async {
                Err(InventoryError::InternalError(
                    "loader must not run on a warm cache".to_string(),
                ))
            })
            .await
            .expect("cached read");
        assert_eq!(second, vec!["SN-1".to_string()]);

        cache.invalidate_all().await.expect("invalidate");

        let third: Vec<String> = cache
            .get_or_load("devices", || async { Ok(vec!["SN-2".to_string()]) })
            .await
            .expect("reload");
        assert_eq!(third, vec!["SN-2".to_string()]);
    }

    #[tokio::test]
    async fn invalidation_is_blanket_across_tables() {
        let cache = SnapshotCache::in_memory();
        let _: Vec<u32> = cache
            .get_or_load("devices", || async { Ok(vec![1]) })
            .await
            .unwrap();
        let _: Vec<u32> = cache
            .get_or_load("components", || async { Ok(vec![2]) })
            .await
            .unwrap();

        cache.invalidate_all().await.unwrap();

        let reloaded: Vec<u32> = cache
            .get_or_load("components", || async { Ok(vec![3]) })
            .await
            .unwrap();
        assert_eq!(reloaded, vec![3]);
    }
}
