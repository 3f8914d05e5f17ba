//! Secret sources for login credentials.
//!
//! A secret source yields the `name → password` mapping that login requests
//! are checked against. The mapping is owned by an external system; this
//! service only reads it.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

/// Login name to password.
pub type SecretMap = HashMap<String, String>;

/// Secret source trait.
#[async_trait]
pub trait SecretSource: Send + Sync {
    /// Fetch the current mapping.
    async fn fetch(&self) -> Result<SecretMap>;

    /// Short label for logs (e.g., "file", "http").
    fn kind(&self) -> &'static str;
}

/// Fixed in-memory mapping.
#[derive(Debug, Clone, Default)]
pub struct StaticSecretSource {
    secrets: SecretMap,
}

impl StaticSecretSource {
    pub fn new(secrets: SecretMap) -> Self {
        Self { secrets }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StaticSecretSource {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[async_trait]
impl SecretSource for StaticSecretSource {
    async fn fetch(&self) -> Result<SecretMap> {
        Ok(self.secrets.clone())
    }

    fn kind(&self) -> &'static str {
        "static"
    }
}

/// JSON object read from disk on every fetch.
#[derive(Debug, Clone)]
pub struct FileSecretSource {
    path: PathBuf,
}

impl FileSecretSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SecretSource for FileSecretSource {
    async fn fetch(&self) -> Result<SecretMap> {
        let data = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("failed to read secrets file {}", self.path.display()))?;
        let secrets: SecretMap =
            serde_json::from_slice(&data).context("secrets file is not a JSON string map")?;
        debug!(path = ?self.path, entries = secrets.len(), "secrets loaded from file");
        Ok(secrets)
    }

    fn kind(&self) -> &'static str {
        "file"
    }
}

/// JSON object fetched from a remote secrets endpoint.
#[derive(Debug, Clone)]
pub struct HttpSecretSource {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl HttpSecretSource {
    /// Create a new HTTP secret source. `timeout` bounds each request.
    pub fn new(url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap_or_default();

        Self {
            client,
            url: url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl SecretSource for HttpSecretSource {
    async fn fetch(&self) -> Result<SecretMap> {
        let mut request = self.client.get(&self.url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let secrets = request
            .send()
            .await
            .context("secrets request failed")?
            .error_for_status()
            .context("secrets endpoint returned an error status")?
            .json::<SecretMap>()
            .await
            .context("secrets response is not a JSON string map")?;

        debug!(entries = secrets.len(), "secrets fetched over HTTP");
        Ok(secrets)
    }

    fn kind(&self) -> &'static str {
        "http"
    }
}

/// Reuses another source's mapping for a fixed TTL.
///
/// Failed fetches are not cached; the next call retries the inner source.
pub struct CachedSecretSource {
    inner: Arc<dyn SecretSource>,
    cache: Cache<&'static str, Arc<SecretMap>>,
}

const CACHE_KEY: &str = "secrets";

impl CachedSecretSource {
    pub fn new(inner: Arc<dyn SecretSource>, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(1).time_to_live(ttl).build();
        Self { inner, cache }
    }
}

#[async_trait]
impl SecretSource for CachedSecretSource {
    async fn fetch(&self) -> Result<SecretMap> {
        let secrets = self
            .cache
            .try_get_with(CACHE_KEY, async { self.inner.fetch().await.map(Arc::new) })
            .await
            .map_err(|e| anyhow::anyhow!("{e:#}"))?;
        Ok(secrets.as_ref().clone())
    }

    fn kind(&self) -> &'static str {
        self.inner.kind()
    }
}

impl std::fmt::Debug for CachedSecretSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedSecretSource")
            .field("inner", &self.inner.kind())
            .finish()
    }
}
