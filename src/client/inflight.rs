//! In-flight request registry.
//!
//! Tracks a cancellation token per request key for requests that take part
//! in supersession. Default-keyed GETs are never stored here.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::key::RequestKey;
use crate::models::Method;

/// A stored handle: the token plus the generation that installed it.
#[derive(Debug)]
struct Registration {
    id: u64,
    token: CancellationToken,
}

/// Key to cancellation-token map for outstanding requests.
#[derive(Debug, Default)]
pub struct InFlightRegistry {
    handles: HashMap<String, Registration>,
    next_id: u64,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a handle for `key`.
    ///
    /// For explicit keys and mutations, an existing handle under the same key
    /// is cancelled and replaced. Default-keyed GETs get a token that is
    /// neither stored nor able to cancel anything.
    ///
    /// Returns the token and, when stored, the generation id to release with.
    pub fn register(&mut self, key: &RequestKey, method: Method) -> (CancellationToken, Option<u64>) {
        let token = CancellationToken::new();

        if !key.supersedes(method) {
            debug!("{} {} runs untracked", method, key.key);
            return (token, None);
        }

        self.next_id += 1;
        let id = self.next_id;
        let previous = self.handles.insert(
            key.key.clone(),
            Registration {
                id,
                token: token.clone(),
            },
        );

        if let Some(previous) = previous {
            warn!("{} {} superseded an in-flight request", method, key.key);
            previous.token.cancel();
        } else {
            debug!("{} {} registered", method, key.key);
        }

        (token, Some(id))
    }

    /// Removes the handle for `key` if it still belongs to generation `id`.
    ///
    /// A superseded call settling late must not remove its successor's handle.
    pub fn release(&mut self, key: &str, id: u64) -> bool {
        match self.handles.get(key) {
            Some(registration) if registration.id == id => {
                self.handles.remove(key);
                true
            }
            _ => false,
        }
    }

    /// Cancels and removes every stored handle.
    ///
    /// Returns the number of requests cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.handles.len();
        for (_, registration) in self.handles.drain() {
            registration.token.cancel();
        }
        if count > 0 {
            info!("Cancelled {} in-flight requests", count);
        }
        count
    }

    pub fn contains(&self, key: &str) -> bool {
        self.handles.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// Shared registry handle.
pub type SharedRegistry = Arc<Mutex<InFlightRegistry>>;

/// Locks the registry, recovering from poisoning (the map has no
/// invariants a panicking holder could break halfway).
pub fn lock(registry: &SharedRegistry) -> MutexGuard<'_, InFlightRegistry> {
    registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// == In-Flight Guard ==
/// Registration held for the lifetime of one network attempt.
///
/// Dropping the guard releases the handle, so the registry is cleaned up on
/// success, failure, cancellation, and when the caller drops the future.
#[derive(Debug)]
pub struct InFlightGuard {
    registry: SharedRegistry,
    key: String,
    id: Option<u64>,
    token: CancellationToken,
}

impl InFlightGuard {
    /// Registers `key` on `registry` per the supersession policy.
    pub fn register(registry: &SharedRegistry, key: &RequestKey, method: Method) -> Self {
        let (token, id) = lock(registry).register(key, method);
        Self {
            registry: Arc::clone(registry),
            key: key.key.clone(),
            id,
            token,
        }
    }

    /// Token signalled when this request is superseded or bulk-cancelled.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Whether a handle was stored for this request.
    pub fn is_tracked(&self) -> bool {
        self.id.is_some()
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Some(id) = self.id {
            lock(&self.registry).release(&self.key, id);
        }
    }
}
