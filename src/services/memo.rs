//! Single-value response memo for feed clients
//!
//! Holds at most one successful response per feed. Failures are never
//! stored. Without a TTL the first stored value is kept until
//! `invalidate()` is called; with a TTL it is refetched once stale.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

struct MemoEntry<T> {
    value: Arc<T>,
    stored_at: i64,
}

pub struct MemoCache<T> {
    name: &'static str,
    ttl: Option<Duration>,
    slot: Arc<RwLock<Option<MemoEntry<T>>>>,
}

impl<T> MemoCache<T> {
    pub fn new(name: &'static str, ttl: Option<Duration>) -> Self {
        Self {
            name,
            ttl,
            slot: Arc::new(RwLock::new(None)),
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    fn is_fresh(&self, entry: &MemoEntry<T>, now: i64) -> bool {
        match self.ttl {
            None => true,
            Some(ttl) => {
                let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
                now.saturating_sub(entry.stored_at) < ttl_ms
            }
        }
    }

    /// Current value if present and not stale
    pub async fn get(&self) -> Option<Arc<T>> {
        let slot = self.slot.read().await;
        let entry = slot.as_ref()?;
        let now = chrono::Utc::now().timestamp_millis();
        if !self.is_fresh(entry, now) {
            return None;
        }
        Some(Arc::clone(&entry.value))
    }

    /// Return the memoized value, or run `fetch` and store its result on success.
    ///
    /// When two fetches race, the first to store wins and the later result is
    /// discarded in its favor.
    pub async fn get_or_try_fetch<F, Fut, E>(&self, fetch: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get().await {
            tracing::debug!(cache = self.name, "memo hit");
            return Ok(value);
        }

        let fetched = fetch().await?;

        let mut slot = self.slot.write().await;
        let now = chrono::Utc::now().timestamp_millis();
        if let Some(existing) = slot.as_ref() {
            if self.is_fresh(existing, now) {
                return Ok(Arc::clone(&existing.value));
            }
        }

        let value = Arc::new(fetched);
        *slot = Some(MemoEntry {
            value: Arc::clone(&value),
            stored_at: now,
        });
        tracing::debug!(cache = self.name, "memo stored");
        Ok(value)
    }

    /// Drop the stored value so the next call refetches
    pub async fn invalidate(&self) {
        let mut slot = self.slot.write().await;
        if slot.take().is_some() {
            tracing::info!(cache = self.name, "memo invalidated");
        }
    }
}

impl<T> Clone for MemoCache<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            ttl: self.ttl,
            slot: Arc::clone(&self.slot),
        }
    }
}
