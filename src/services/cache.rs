//! Read-through cache for payment lookups
//!
//! Every write clears the whole cache. A generation counter guards the
//! window between a read hitting storage and its result landing in the
//! cache, so a load that raced a write never leaves a stale entry behind.

use dashmap::DashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use crate::models::payment::Payment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Id(i64),
    All,
    User(i64),
    Order(i64),
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Id(id) => write!(f, "id:{}", id),
            CacheKey::All => write!(f, "all"),
            CacheKey::User(user_id) => write!(f, "user:{}", user_id),
            CacheKey::Order(order_id) => write!(f, "order:{}", order_id),
        }
    }
}

#[derive(Debug, Clone)]
enum Entry {
    One(Payment),
    Many(Vec<Payment>),
}

#[derive(Default)]
pub struct PaymentCache {
    entries: DashMap<CacheKey, Entry>,
    generation: AtomicU64,
}

impl PaymentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached single lookup. Misses (`None`) are not stored.
    pub async fn one<E, F, Fut>(&self, key: CacheKey, load: F) -> Result<Option<Payment>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<Payment>, E>>,
    {
        if let Some(Entry::One(payment)) = self.entries.get(&key).map(|e| e.value().clone()) {
            debug!("[cache] hit {}", key);
            return Ok(Some(payment));
        }

        let generation = self.generation.load(Ordering::Acquire);
        let loaded = load().await?;
        if let Some(payment) = &loaded {
            self.store(key, Entry::One(payment.clone()), generation);
        }
        Ok(loaded)
    }

    /// Cached list lookup. Empty results are only stored under
    /// `CacheKey::All`, so unknown user or order ids never take up entries.
    pub async fn many<E, F, Fut>(&self, key: CacheKey, load: F) -> Result<Vec<Payment>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Payment>, E>>,
    {
        if let Some(Entry::Many(payments)) = self.entries.get(&key).map(|e| e.value().clone()) {
            debug!("[cache] hit {}", key);
            return Ok(payments);
        }

        let generation = self.generation.load(Ordering::Acquire);
        let loaded = load().await?;
        if !loaded.is_empty() || key == CacheKey::All {
            self.store(key, Entry::Many(loaded.clone()), generation);
        }
        Ok(loaded)
    }

    pub fn evict_all(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.entries.clear();
        debug!("[cache] evicted all entries");
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn store(&self, key: CacheKey, entry: Entry, generation: u64) {
        if self.generation.load(Ordering::Acquire) != generation {
            return;
        }
        self.entries.insert(key, entry);
        // An eviction may have cleared the map between the check and the insert.
        if self.generation.load(Ordering::Acquire) != generation {
            self.entries.remove(&key);
        }
    }
}
