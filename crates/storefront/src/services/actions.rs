//! Single-flight guard for mutating actions.
//!
//! At most one action per [`ActionKey`] runs at a time. A second submission
//! for a key that is still in flight fails with [`AppError::Busy`] without
//! running. An in-flight action can be cancelled by key; its future is
//! dropped at the next await point and the caller gets
//! [`AppError::Cancelled`].

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Notify;
use tracing::debug;

use crate::error::{AppError, Result};

/// Identifies the resource a mutating action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionKey {
    resource: &'static str,
    id: i64,
    scope: Option<i64>,
}

impl ActionKey {
    #[must_use]
    pub const fn new(resource: &'static str, id: i64) -> Self {
        Self {
            resource,
            id,
            scope: None,
        }
    }

    /// Key for a sub-resource, e.g. one image within one slider.
    #[must_use]
    pub const fn scoped(resource: &'static str, id: i64, scope: i64) -> Self {
        Self {
            resource,
            id,
            scope: Some(scope),
        }
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            Some(scope) => write!(f, "{}:{}/{}", self.resource, self.id, scope),
            None => write!(f, "{}:{}", self.resource, self.id),
        }
    }
}

/// Tracks in-flight actions. Clones share the same registry.
#[derive(Debug, Clone, Default)]
pub struct ActionGuard {
    in_flight: Arc<Mutex<HashMap<ActionKey, Arc<Notify>>>>,
}

impl ActionGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` unless another action with the same key is in flight.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Busy` if `key` is already in flight,
    /// `AppError::Cancelled` if [`cancel`](Self::cancel) is called before
    /// `action` completes, and otherwise whatever `action` returns.
    pub async fn run<T, F>(&self, key: ActionKey, action: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let permit = self.acquire(key)?;

        tokio::select! {
            biased;
            () = permit.cancelled.notified() => {
                debug!(action = %key, "Action cancelled");
                Err(AppError::Cancelled(key.to_string()))
            }
            result = action => result,
        }
    }

    /// Cancel the in-flight action for `key`. Returns `false` if none is running.
    pub fn cancel(&self, key: ActionKey) -> bool {
        let in_flight = self.lock();
        match in_flight.get(&key) {
            Some(cancelled) => {
                cancelled.notify_one();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_in_flight(&self, key: ActionKey) -> bool {
        self.lock().contains_key(&key)
    }

    fn acquire(&self, key: ActionKey) -> Result<Permit<'_>> {
        let mut in_flight = self.lock();
        if in_flight.contains_key(&key) {
            debug!(action = %key, "Action already in flight");
            return Err(AppError::Busy(key.to_string()));
        }

        let cancelled = Arc::new(Notify::new());
        in_flight.insert(key, Arc::clone(&cancelled));
        Ok(Permit {
            guard: self,
            key,
            cancelled,
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ActionKey, Arc<Notify>>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases the key when the action finishes, fails or is dropped.
struct Permit<'a> {
    guard: &'a ActionGuard,
    key: ActionKey,
    cancelled: Arc<Notify>,
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        self.guard.lock().remove(&self.key);
    }
}
