//! API Client Module
//!
//! Cached, cancellation-aware HTTP client used by every UI store.
//!
//! # Components
//! - `key`: request key derivation
//! - `inflight`: in-flight registry and supersession policy
//! - `executor`: the per-call state machine
//!
//! GET responses are cached for the configured TTL. Concurrent GETs never
//! cancel each other; only calls sharing an explicit key (or a bulk
//! `cancel_all_requests`) can cancel an in-flight request.

mod executor;
pub mod inflight;
pub mod key;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::info;

use crate::cache::{CacheStats, CacheStore};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{Method, RequestOptions};

use inflight::{InFlightRegistry, SharedRegistry};

pub use inflight::InFlightGuard;
pub use key::{token_fingerprint, RequestKey};

// == Api Client ==
/// HTTP client with its own cache store and in-flight registry.
///
/// Cloning is cheap; clones share the cache and registry, so one instance
/// can be handed to every store of a tenant.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    cache: Arc<RwLock<CacheStore>>,
    registry: SharedRegistry,
}

impl ApiClient {
    // == Constructors ==
    /// Creates a client from configuration with a default `reqwest::Client`.
    pub fn new(config: &Config) -> Self {
        Self::with_http_client(config, reqwest::Client::new())
    }

    /// Creates a client from environment configuration.
    pub fn from_env() -> Self {
        Self::new(&Config::from_env())
    }

    /// Creates a client around an existing `reqwest::Client`.
    pub fn with_http_client(config: &Config, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cache: Arc::new(RwLock::new(CacheStore::new(config.ttl()))),
            registry: Arc::new(Mutex::new(InFlightRegistry::new())),
        }
    }

    /// Base URL endpoints are joined to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Cache entry lifetime.
    pub async fn cache_ttl(&self) -> Duration {
        self.cache.read().await.ttl()
    }

    fn url_for(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    // == Verb Wrappers ==
    /// GET `endpoint`, served from cache when a fresh entry exists.
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        token: Option<&str>,
        options: RequestOptions,
    ) -> Result<T> {
        self.send(Method::Get, endpoint, token, None::<&()>, options).await
    }

    /// POST `body` as JSON to `endpoint`.
    pub async fn post<T, B>(
        &self,
        endpoint: &str,
        token: Option<&str>,
        body: Option<&B>,
        options: RequestOptions,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::Post, endpoint, token, body, options).await
    }

    /// PUT `body` as JSON to `endpoint`.
    pub async fn put<T, B>(
        &self,
        endpoint: &str,
        token: Option<&str>,
        body: Option<&B>,
        options: RequestOptions,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::Put, endpoint, token, body, options).await
    }

    /// PATCH `body` as JSON to `endpoint`.
    pub async fn patch<T, B>(
        &self,
        endpoint: &str,
        token: Option<&str>,
        body: Option<&B>,
        options: RequestOptions,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::Patch, endpoint, token, body, options).await
    }

    /// DELETE `endpoint`, with an optional JSON body.
    pub async fn delete<T, B>(
        &self,
        endpoint: &str,
        token: Option<&str>,
        body: Option<&B>,
        options: RequestOptions,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::Delete, endpoint, token, body, options).await
    }

    async fn send<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        token: Option<&str>,
        body: Option<&B>,
        options: RequestOptions,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(ApiError::Encode)?;
        let payload: Value = self.execute(method, endpoint, token, body, &options).await?;
        Ok(serde_json::from_value(payload)?)
    }

    // == Bulk Operations ==
    /// Drops cached entries whose key contains `pattern`, or all entries.
    ///
    /// Returns the number of entries removed.
    pub async fn clear_cache(&self, pattern: Option<&str>) -> usize {
        let removed = self.cache.write().await.clear(pattern);
        match pattern {
            Some(pattern) => info!("Cleared {} cache entries matching '{}'", removed, pattern),
            None => info!("Cleared entire cache ({} entries)", removed),
        }
        removed
    }

    /// Cancels every tracked in-flight request (e.g. on tenant switch).
    ///
    /// Default-keyed GETs are untracked and run to completion.
    pub fn cancel_all_requests(&self) -> usize {
        inflight::lock(&self.registry).cancel_all()
    }

    // == Introspection ==
    /// Returns current cache and request statistics.
    pub async fn stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    /// Number of tracked in-flight requests.
    pub fn in_flight_count(&self) -> usize {
        inflight::lock(&self.registry).len()
    }
}
