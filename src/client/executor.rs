//! Request executor.
//!
//! Runs one call through cache lookup, supersession, the network round-trip,
//! and result interpretation:
//!
//! `PENDING -> (CACHE_HIT | NETWORK_INFLIGHT) -> (SUCCESS | FAILURE | CANCELLED)`

use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::inflight::InFlightGuard;
use crate::client::key::RequestKey;
use crate::client::ApiClient;
use crate::error::{ApiError, Result};
use crate::models::{CancelledGetPolicy, ErrorBody, Method, RequestOptions};

impl ApiClient {
    /// Executes a request and returns the decoded JSON payload.
    pub(crate) async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        token: Option<&str>,
        body: Option<Value>,
        options: &RequestOptions,
    ) -> Result<Value> {
        let key = RequestKey::derive(method, endpoint, token, options.cache_key.as_deref());
        let cacheable = method == Method::Get && !options.skip_cache;

        if cacheable {
            if let Some(payload) = self.cache.write().await.get(&key.base) {
                debug!("Cache hit: {}", key.base);
                return Ok(payload);
            }
            debug!("Cache miss: {}", key.base);
        }

        let guard = InFlightGuard::register(&self.registry, &key, method);

        let mut request = self.http.request(method.into(), self.url_for(endpoint));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        self.cache.write().await.stats_mut().record_network_request();

        let outcome = tokio::select! {
            biased;
            _ = guard.token().cancelled() => None,
            result = async {
                let response = request.send().await?;
                let status = response.status();
                let bytes = response.bytes().await?;
                Ok::<_, reqwest::Error>((status, bytes))
            } => Some(result),
        };

        // Settled: release before touching the cache again.
        drop(guard);

        match outcome {
            None => self.on_cancelled(method, &key, cacheable, options).await,
            Some(Err(err)) => {
                warn!("{} {} failed: {}", method, endpoint, err);
                Err(ApiError::Transport(err))
            }
            Some(Ok((status, bytes))) if !status.is_success() => {
                Err(http_failure(method, endpoint, status, &bytes))
            }
            Some(Ok((_, bytes))) => {
                let payload = decode_payload(&bytes)?;
                if cacheable {
                    self.cache.write().await.put(key.base.clone(), payload.clone());
                    debug!("Cached {}", key.base);
                }
                Ok(payload)
            }
        }
    }

    async fn on_cancelled(
        &self,
        method: Method,
        key: &RequestKey,
        cacheable: bool,
        options: &RequestOptions,
    ) -> Result<Value> {
        let mut cache = self.cache.write().await;

        if cacheable && options.on_cancelled_get == CancelledGetPolicy::FallbackToCache {
            if let Some(payload) = cache.get_stale(&key.base) {
                debug!("{} {} cancelled, served from cache", method, key.key);
                cache.stats_mut().record_fallback();
                return Ok(payload);
            }
        }

        debug!("{} {} cancelled", method, key.key);
        cache.stats_mut().record_cancellation();
        Err(ApiError::Cancelled)
    }
}

fn http_failure(method: Method, endpoint: &str, status: StatusCode, bytes: &[u8]) -> ApiError {
    let status = status.as_u16();
    let message = ErrorBody::parse(bytes).into_message(status);
    warn!("{} {} returned {}: {}", method, endpoint, status, message);
    ApiError::Http { status, message }
}

/// Empty bodies (204 and friends) decode as `null`.
fn decode_payload(bytes: &[u8]) -> Result<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(bytes)?)
}
