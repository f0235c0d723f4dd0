//! # distcache
//!
//! Typed object-caching layer over a distributed key-value store.
//!
//! ## Features
//!
//! - 💾 **Typed access**: serialize any serde type to a compact MessagePack payload
//! - 🔁 **Read-through**: get-or-compute-and-store with optional expiration
//! - 🧩 **Pluggable formatters**: ordered codec chain, resolved once per type
//! - ⏱️ **TTL support**: expiration delegated to the store as a "now + ttl" hint
//! - 🔄 **Async/Await**: built on Tokio, no background threads of its own
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use distcache::{CacheConfig, CacheStore, RemoteStore};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CacheConfig::from_url("http://localhost:15500/0?prefix=app")?;
//!     let cache = CacheStore::new(RemoteStore::new(config)?);
//!
//!     cache.set_object("user:1", Some(&"John Doe".to_string()), None).await?;
//!     let value: Option<String> = cache.get_object("user:1").await?;
//!     println!("Value: {:?}", value);
//!
//!     // Read-through: populate on miss, expire after an hour
//!     let profile = cache
//!         .get_or_set_object("profile:1", || async { Ok(Some(load_profile())) },
//!             Some(Duration::from_secs(3600)))
//!         .await?;
//!     println!("Profile: {:?}", profile);
//!     Ok(())
//! }
//!
//! fn load_profile() -> String {
//!     "from the database".to_string()
//! }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod formatter;
pub mod store;

pub use cache::CacheStore;
pub use client::RemoteStore;
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use formatter::{Formatter, FormatterKind, FormatterRegistry};
pub use store::{MemoryStore, StoreBackend};
