//! Cycle-scoped single-flight cache for the bundle-refunds fetch (C7).
//!
//! Spec §4.7: the first call within a cycle fetches refunds; subsequent
//! callers within the same cycle await the same pending result. Spec §9's
//! design notes call this "a task-local or cycle-scoped cache with a
//! single-flight guard". Holding the lock across the fetch's `.await` is
//! what gives the single-flight property: a second caller arriving while
//! the first fetch is still in flight blocks on the mutex rather than
//! issuing its own fetch, then reads the same cached value once the first
//! caller finishes and releases the lock.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::collaborators::RefundSet;

pub struct RefundCache {
    inner: Mutex<Option<Arc<Vec<RefundSet>>>>,
}

impl RefundCache {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }

    /// Invalidates the cache. Call at a cycle boundary so the next call
    /// re-fetches rather than reusing a previous cycle's refunds.
    pub async fn reset(&self) {
        *self.inner.lock().await = None;
    }

    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> anyhow::Result<Arc<Vec<RefundSet>>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<Vec<RefundSet>>>,
    {
        let mut guard = self.inner.lock().await;
        if let Some(cached) = guard.as_ref() {
            return Ok(cached.clone());
        }
        let fetched = Arc::new(fetch().await?);
        *guard = Some(fetched.clone());
        Ok(fetched)
    }
}

impl Default for RefundCache {
    fn default() -> Self {
        Self::new()
    }
}
