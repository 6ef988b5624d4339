//! Request-side types for the API client
//!
//! Defines HTTP verbs and the per-call options callers pass to the verb wrappers.

use std::fmt;

// == Method ==
/// HTTP verb of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Uppercase verb name, as used in request keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// True for every verb except GET.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Method::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

// == Cancelled GET Policy ==
/// What a GET does when it is cancelled before settling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CancelledGetPolicy {
    /// Return the last cached payload for the request's base key, if any,
    /// even when it is older than the TTL. Fails with `Cancelled` otherwise.
    #[default]
    FallbackToCache,
    /// Always fail with `Cancelled`.
    Error,
}

// == Request Options ==
/// Per-call options forwarded from the verb wrappers to the executor.
///
/// # Fields
/// - `skip_cache`: bypass the cache read and write for this GET
/// - `cache_key`: explicit key; shared by every call that passes it
/// - `on_cancelled_get`: fallback behaviour for a cancelled GET
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Bypass the cache for this call
    pub skip_cache: bool,
    /// Explicit request key, used verbatim
    pub cache_key: Option<String>,
    /// Behaviour when a GET is cancelled
    pub on_cancelled_get: CancelledGetPolicy,
}

impl RequestOptions {
    /// Options with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bypasses the cache for this call.
    pub fn skip_cache(mut self) -> Self {
        self.skip_cache = true;
        self
    }

    /// Sets an explicit key. Two in-flight calls with the same key collide:
    /// the newer one cancels the older.
    pub fn cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key = Some(key.into());
        self
    }

    /// Sets the cancelled-GET policy.
    pub fn on_cancelled_get(mut self, policy: CancelledGetPolicy) -> Self {
        self.on_cancelled_get = policy;
        self
    }
}
