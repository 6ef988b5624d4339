//! Request key derivation.
//!
//! A key identifies a request for both the cache and the in-flight registry.
//! GET keys are stable so repeated reads share a cache entry; mutation keys
//! carry a salt so independent writes never collide.

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::models::Method;

/// Hex characters of the token digest kept in a key.
const FINGERPRINT_LEN: usize = 16;

/// Fingerprint used when no bearer token is supplied.
const ANONYMOUS: &str = "anon";

/// Key under which a request is registered and cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestKey {
    /// Registry key; salted for unlabelled mutations
    pub key: String,
    /// Unsalted key, used for cache lookups and cancellation fallback
    pub base: String,
    /// Whether the caller supplied the key
    pub explicit: bool,
}

impl RequestKey {
    /// Derives the key for a call.
    ///
    /// An explicit key is used verbatim. Otherwise GET yields
    /// `GET:{endpoint}:{fingerprint}` and every other verb appends
    /// `:{unix_millis}:{random}` to the same shape.
    pub fn derive(
        method: Method,
        endpoint: &str,
        token: Option<&str>,
        explicit: Option<&str>,
    ) -> Self {
        if let Some(explicit) = explicit {
            return Self {
                key: explicit.to_string(),
                base: explicit.to_string(),
                explicit: true,
            };
        }

        let base = format!("{}:{}:{}", method, endpoint, token_fingerprint(token));
        let key = if method.is_mutating() {
            format!("{}:{}", base, salt())
        } else {
            base.clone()
        };

        Self {
            key,
            base,
            explicit: false,
        }
    }

    /// Whether calls under this key take part in supersession.
    ///
    /// Default-keyed GETs never do: concurrent reads of the same resource
    /// must all run to completion.
    pub fn supersedes(&self, method: Method) -> bool {
        self.explicit || method.is_mutating()
    }
}

/// Truncated SHA-256 of the bearer token, or `anon` without one.
///
/// Bearer JWTs share their leading bytes across users, so a raw prefix
/// would let two users share cache entries.
pub fn token_fingerprint(token: Option<&str>) -> String {
    match token {
        Some(token) => {
            let mut fingerprint = hex::encode(Sha256::digest(token.as_bytes()));
            fingerprint.truncate(FINGERPRINT_LEN);
            fingerprint
        }
        None => ANONYMOUS.to_string(),
    }
}

fn salt() -> String {
    format!(
        "{}:{}",
        chrono::Utc::now().timestamp_millis(),
        &Uuid::new_v4().simple().to_string()[..12]
    )
}
