//! Cache store configuration

use crate::error::{CacheError, Result};
use std::time::Duration;
use url::Url;

/// Configuration for a remote cache store
///
/// Built either directly with [`CacheConfig::new`] or parsed from a
/// connection URL with [`CacheConfig::from_url`]. The logical-database
/// selector is mandatory when parsing a URL; an optional key prefix
/// namespaces every key written through the store.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Base URL of the store server
    pub base_url: String,
    /// Logical database index
    pub database: u32,
    /// Optional key prefix, applied as `prefix:key`
    pub prefix: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Optional authentication token
    pub auth_token: Option<String>,
}

impl CacheConfig {
    /// Create a new configuration with the given base URL and database index
    pub fn new(base_url: impl Into<String>, database: u32) -> Self {
        Self {
            base_url: base_url.into(),
            database,
            prefix: None,
            timeout: Duration::from_secs(30),
            auth_token: None,
        }
    }

    /// Parse a connection URL of the form `http://host:port/<db>?prefix=app`
    ///
    /// The database path segment is mandatory; a URL that does not select a
    /// logical database is a configuration error, not something resolved at
    /// first use.
    pub fn from_url(url: impl AsRef<str>) -> Result<Self> {
        let parsed = Url::parse(url.as_ref())?;

        let database = parsed
            .path_segments()
            .and_then(|mut segments| segments.next())
            .filter(|segment| !segment.is_empty())
            .and_then(|segment| segment.parse::<u32>().ok())
            .ok_or(CacheError::MissingDatabase)?;

        let prefix = parsed
            .query_pairs()
            .find(|(name, _)| name == "prefix")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.trim().is_empty());

        let mut base = parsed.clone();
        base.set_path("");
        base.set_query(None);

        Ok(Self {
            base_url: base.to_string(),
            database,
            prefix,
            timeout: Duration::from_secs(30),
            auth_token: None,
        })
    }

    /// Set the key prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the timeout for requests
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the authentication token
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }
}
