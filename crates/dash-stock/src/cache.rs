//! Caching layer for provider responses
//!
//! Entries are keyed by the full argument tuple of the cached operation and
//! expire after a fixed TTL. Each cache holds a bounded number of entries and
//! evicts the least recently used one when full. The cache is process-wide:
//! two callers asking for the same ticker share one entry.

use crate::model::{AnalysisText, PriceSeries, RatingsSnapshot, StockInfo};
use cached::{Cached, TimedSizedCache};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Cache key for provider requests
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    /// Stock symbol
    pub symbol: String,
    /// Operation name
    pub endpoint: String,
    /// Remaining arguments as a JSON string
    pub params: String,
}

impl CacheKey {
    /// Create a new cache key
    pub fn new(
        symbol: impl Into<String>,
        endpoint: impl Into<String>,
        params: impl Serialize,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            endpoint: endpoint.into(),
            params: serde_json::to_string(&params).unwrap_or_default(),
        }
    }
}

/// Default number of entries per cache
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Thread-safe, time-expiring, size-bounded cache for one kind of value
pub struct StockCache<V> {
    cache: Arc<RwLock<TimedSizedCache<CacheKey, V>>>,
    ttl: Duration,
}

impl<V: Clone> StockCache<V> {
    /// Create a new cache with specified TTL and the default capacity
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY, ttl)
    }

    /// Create a cache holding at most `capacity` entries (at least one)
    pub fn with_capacity(capacity: usize, ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedSizedCache::with_size_and_lifespan(
                capacity.max(1),
                ttl,
            ))),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get a value from the cache; expired entries read as absent
    pub async fn get(&self, key: &CacheKey) -> Option<V> {
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    /// Insert a value into the cache, replacing any previous entry
    ///
    /// Expired entries are dropped first so keys that are never read again
    /// do not linger until evicted.
    pub async fn insert(&self, key: CacheKey, value: V) {
        let mut cache = self.cache.write().await;
        cache.flush();
        let _ = cache.cache_set(key, value);
    }

    /// Get or fetch a value using the provided fetcher function
    ///
    /// If the value exists in cache, it's returned immediately.
    /// Otherwise, the fetcher function is called and a successful result is
    /// cached. Errors are returned as-is and leave the cache untouched, so the
    /// next call retries the provider.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: CacheKey, fetcher: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            tracing::debug!("Cache hit for key: {:?}", key);
            return Ok(value);
        }

        tracing::debug!("Cache miss for key: {:?}", key);

        let value = fetcher().await?;
        self.insert(key, value.clone()).await;

        Ok(value)
    }

    /// Clear all cached entries
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }

    /// Number of stored entries, including expired ones not yet flushed
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<V> Clone for StockCache<V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            ttl: self.ttl,
        }
    }
}

impl<V> Debug for StockCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockCache").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

/// One cache per cached operation
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Stock info; `None` records a ticker the provider does not know
    pub info: StockCache<Option<StockInfo>>,
    /// Price history per (ticker, period, extended hours)
    pub history: StockCache<PriceSeries>,
    /// Analyst ratings
    pub ratings: StockCache<RatingsSnapshot>,
    /// LLM outlook per (ticker, model, template)
    pub analysis: StockCache<AnalysisText>,
}

impl CacheManager {
    /// Create a cache manager; history gets its own TTL
    pub fn new(capacity: usize, ttl: Duration, history_ttl: Duration) -> Self {
        Self {
            info: StockCache::with_capacity(capacity, ttl),
            history: StockCache::with_capacity(capacity, history_ttl),
            ratings: StockCache::with_capacity(capacity, ttl),
            analysis: StockCache::with_capacity(capacity, ttl),
        }
    }

    /// Clear all caches
    pub async fn clear_all(&self) {
        self.info.clear().await;
        self.history.clear().await;
        self.ratings.clear().await;
        self.analysis.clear().await;
    }
}
