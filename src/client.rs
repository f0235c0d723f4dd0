//! HTTP client backend for a remote key-value store

use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::store::StoreBackend;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use url::Url;

/// Remote store backend speaking the JSON command protocol
///
/// Every operation is one POST to `api/v1/command` with an envelope:
/// ```json
/// {
///   "command": "kv.get",
///   "request_id": "uuid",
///   "payload": { "key": "...", "db": 0 }
/// }
/// ```
/// Binary payloads travel base64-encoded inside the JSON envelope; string
/// values travel as plain JSON strings through the `kv.getstr`/`kv.setstr`
/// commands. The configured logical database rides in every payload, and the
/// configured prefix is applied to keys transparently — callers of the cache
/// layer never see it.
#[derive(Clone)]
pub struct RemoteStore {
    http_client: Client,
    base_url: Url,
    database: u32,
    prefix: Option<String>,
}

impl RemoteStore {
    /// Create a remote store from its configuration
    pub fn new(config: CacheConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;

        let mut builder = Client::builder().timeout(config.timeout);

        if let Some(ref token) = config.auth_token {
            let mut headers = reqwest::header::HeaderMap::new();
            let value = format!("Bearer {}", token).parse().map_err(|_| {
                CacheError::InvalidArgument("auth token is not a valid header value")
            })?;
            headers.insert(reqwest::header::AUTHORIZATION, value);
            builder = builder.default_headers(headers);
        }

        Ok(Self {
            http_client: builder.build()?,
            base_url,
            database: config.database,
            prefix: config.prefix,
        })
    }

    fn scoped(&self, key: &str) -> String {
        match self.prefix {
            Some(ref prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }

    async fn send_command(&self, command: &str, payload: Value) -> Result<Value> {
        let request_id = uuid::Uuid::new_v4().to_string();

        let body = json!({
            "command": command,
            "request_id": request_id,
            "payload": payload,
        });

        let url = self.base_url.join("api/v1/command")?;
        let response = self.http_client.post(url).json(&body).send().await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CacheError::StoreError(error_text));
        }

        let result: Value = response.json().await?;

        if !result["success"].as_bool().unwrap_or(false) {
            let error_msg = result["error"]
                .as_str()
                .unwrap_or("unknown error")
                .to_string();
            return Err(CacheError::StoreError(error_msg));
        }

        Ok(result["payload"].clone())
    }
}

#[async_trait]
impl StoreBackend for RemoteStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let payload = json!({"key": self.scoped(key), "db": self.database});
        let response = self.send_command("kv.get", payload).await?;

        if response.is_null() {
            return Ok(None);
        }

        let encoded = response
            .as_str()
            .ok_or_else(|| CacheError::InvalidResponse("expected base64 payload".to_string()))?;
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| CacheError::InvalidResponse(e.to_string()))?;
        Ok(Some(bytes))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        let payload = json!({
            "key": self.scoped(key),
            "db": self.database,
            "value": BASE64.encode(&value),
            "ttl": ttl.map(|ttl| ttl.as_secs()),
        });

        self.send_command("kv.set", payload).await?;
        Ok(())
    }

    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        let payload = json!({"key": self.scoped(key), "db": self.database});
        let response = self.send_command("kv.getstr", payload).await?;

        if response.is_null() {
            return Ok(None);
        }

        let text = response
            .as_str()
            .ok_or_else(|| CacheError::InvalidResponse("expected string payload".to_string()))?;
        Ok(Some(text.to_string()))
    }

    async fn set_string(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let payload = json!({
            "key": self.scoped(key),
            "db": self.database,
            "value": value,
            "ttl": ttl.map(|ttl| ttl.as_secs()),
        });

        self.send_command("kv.setstr", payload).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let payload = json!({"key": self.scoped(key), "db": self.database});
        self.send_command("kv.del", payload).await?;
        Ok(())
    }
}
