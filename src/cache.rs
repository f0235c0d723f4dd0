//! Typed, expiration-aware cache operations

use crate::error::{CacheError, Result};
use crate::formatter::FormatterRegistry;
use crate::store::StoreBackend;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Typed cache over a [`StoreBackend`]
///
/// Serializes values through a shared [`FormatterRegistry`] and provides the
/// read-through access pattern on top of the store's raw get/set. A miss is a
/// normal result (`Ok(None)`), never an error; store failures propagate to
/// the caller untouched — no retries, no degraded path.
///
/// # Example
/// ```no_run
/// use distcache::{CacheStore, MemoryStore};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> distcache::Result<()> {
///     let cache = CacheStore::new(MemoryStore::new());
///
///     let user = cache
///         .get_or_set_object("user:1", || async { Ok(Some("John Doe".to_string())) },
///             Some(Duration::from_secs(3600)))
///         .await?;
///     println!("{:?}", user);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct CacheStore {
    store: Arc<dyn StoreBackend>,
    formats: Arc<FormatterRegistry>,
}

impl CacheStore {
    /// Create a cache over the given store with a fresh formatter registry
    pub fn new(store: impl StoreBackend + 'static) -> Self {
        Self::with_registry(store, FormatterRegistry::new())
    }

    /// Create a cache sharing an existing formatter registry
    pub fn with_registry(store: impl StoreBackend + 'static, registry: FormatterRegistry) -> Self {
        Self {
            store: Arc::new(store),
            formats: Arc::new(registry),
        }
    }

    /// Serialize and store a value, optionally expiring after `ttl`
    ///
    /// An absent value is rejected with `InvalidArgument` before any store
    /// I/O — the codec cannot round-trip absence, so `None` must never reach
    /// the wire.
    pub async fn set_object<T>(&self, key: &str, value: Option<&T>, ttl: Option<Duration>) -> Result<()>
    where
        T: Serialize + Any,
    {
        let value = value.ok_or(CacheError::InvalidArgument("value must not be absent"))?;
        let bytes = self.formats.resolve::<T>().encode(value)?;
        self.store.set(key, bytes, ttl).await
    }

    /// Read and deserialize a value, `Ok(None)` on miss
    pub async fn get_object<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Any,
    {
        let Some(bytes) = self.store.get(key).await? else {
            debug!("cache miss: {}", key);
            return Ok(None);
        };
        let value = self.formats.resolve::<T>().decode(&bytes)?;
        Ok(Some(value))
    }

    /// Read a value, producing it from `fallback` on a miss
    ///
    /// The fallback result is returned as-is and never written back; use
    /// this when the caller manages cache writes separately.
    pub async fn get_object_or_fallback<T, F, Fut>(&self, key: &str, fallback: F) -> Result<Option<T>>
    where
        T: DeserializeOwned + Any,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        if let Some(value) = self.get_object(key).await? {
            return Ok(Some(value));
        }
        fallback().await
    }

    /// Read-through access: read a value, or produce it from `fallback` and
    /// store the result before returning it
    ///
    /// Only a `Some` fallback result is written back. Concurrent callers that
    /// all miss each invoke `fallback` and each write; the store's last write
    /// wins. A store failure during the read aborts the whole operation
    /// before `fallback` runs.
    pub async fn get_or_set_object<T, F, Fut>(
        &self,
        key: &str,
        fallback: F,
        ttl: Option<Duration>,
    ) -> Result<Option<T>>
    where
        T: Serialize + DeserializeOwned + Any,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        if let Some(value) = self.get_object(key).await? {
            return Ok(Some(value));
        }

        let produced = fallback().await?;
        if let Some(ref value) = produced {
            debug!("populating key from fallback: {}", key);
            self.set_object(key, Some(value), ttl).await?;
        }
        Ok(produced)
    }

    /// Read-through access for raw text, bypassing the formatter chain
    ///
    /// Stores and reads through the backend's native string accessors. An
    /// absent fallback result is returned without writing anything — negative
    /// results are not cached.
    pub async fn get_or_set_string<F, Fut>(
        &self,
        key: &str,
        fallback: F,
        ttl: Option<Duration>,
    ) -> Result<Option<String>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<String>>>,
    {
        if let Some(text) = self.store.get_string(key).await? {
            return Ok(Some(text));
        }

        let Some(produced) = fallback().await? else {
            debug!("fallback produced nothing for key: {}", key);
            return Ok(None);
        };
        self.store.set_string(key, &produced, ttl).await?;
        Ok(Some(produced))
    }

    /// Remove a key from the store
    pub async fn remove(&self, key: &str) -> Result<()> {
        self.store.remove(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_cache_clone_shares_store() {
        let cache = CacheStore::new(MemoryStore::new());
        let clone = cache.clone();

        cache
            .set_object("shared", Some(&5u32), None)
            .await
            .unwrap();
        assert_eq!(clone.get_object::<u32>("shared").await.unwrap(), Some(5));
    }

    #[tokio::test]
    async fn test_set_object_rejects_absent_value() {
        let cache = CacheStore::new(MemoryStore::new());
        let err = cache
            .set_object::<String>("k", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, CacheError::InvalidArgument(_)));
    }
}
