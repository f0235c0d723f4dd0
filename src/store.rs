//! Key-value store collaborator contract and the in-process implementation

use crate::error::{CacheError, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// The external key-value store this layer is built on
///
/// TTL is a relative duration; the store derives the absolute expiration
/// instant from "now + ttl" at write time. Keys are opaque strings — any
/// namespacing (instance prefix) is the store's concern, not the caller's.
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// Read the raw payload for a key, `None` on miss or expiry
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write a raw payload, optionally expiring after `ttl`
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()>;

    /// Read a text value through the store's native string accessor
    async fn get_string(&self, key: &str) -> Result<Option<String>>;

    /// Write a text value through the store's native string accessor
    async fn set_string(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()>;

    /// Remove a key; removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<()>;
}

/// A stored payload with its optional expiration deadline
#[derive(Debug, Clone)]
struct StoredValue {
    data: Vec<u8>,
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn new(data: Vec<u8>, ttl: Option<Duration>) -> Self {
        Self {
            data,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// In-process store backend
///
/// Holds entries in a map behind a `parking_lot` lock and expires them lazily
/// on read. Intended for tests and embedded single-process use; it does not
/// implement eviction beyond TTL expiry.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, StoredValue>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read_live(&self, key: &str) -> Option<Vec<u8>> {
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(StoredValue::is_expired) {
            debug!("key expired: {}", key);
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|value| value.data.clone())
    }
}

#[async_trait]
impl StoreBackend for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        debug!("GET key={}", key);
        Ok(self.read_live(key))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        debug!("SET key={}, size={}, ttl={:?}", key, value.len(), ttl);
        self.entries
            .write()
            .insert(key.to_string(), StoredValue::new(value, ttl));
        Ok(())
    }

    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        match self.read_live(key) {
            Some(bytes) => {
                let text = String::from_utf8(bytes)
                    .map_err(|e| CacheError::DeserializationFailed(e.to_string()))?;
                Ok(Some(text))
            }
            None => Ok(None),
        }
    }

    async fn set_string(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        self.set(key, value.as_bytes().to_vec(), ttl).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        debug!("REMOVE key={}", key);
        self.entries.write().remove(key);
        Ok(())
    }
}
