//! In-memory caching using moka
//!
//! Generated schedules are deterministic for a given room type, start date,
//! length and seed, so repeated requests are served from memory until the
//! TTL expires or the catalog changes.

use chrono::NaiveDate;
use moka::future::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::pricing::PricedDay;

/// Application cache holding generated schedules
#[derive(Clone)]
pub struct AppCache {
    /// Priced schedules (schedule_key -> days)
    pub schedules: Cache<String, Arc<Vec<PricedDay>>>,
    ttl: Duration,
}

impl AppCache {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        Self {
            schedules: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .time_to_idle(ttl / 2)
                .build(),
            ttl,
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            schedules_size: self.schedules.entry_count(),
            ttl_secs: self.ttl.as_secs(),
        }
    }

    /// Invalidate all caches
    pub fn invalidate_all(&self) {
        self.schedules.invalidate_all();
        info!("All caches invalidated");
    }

    /// Generate cache key for a schedule
    pub fn schedule_key(room_type_id: Uuid, start_date: NaiveDate, days: i64, seed: u64) -> String {
        format!("schedule:{}:{}:{}:{}", room_type_id, start_date, days, seed)
    }
}

impl Default for AppCache {
    fn default() -> Self {
        // 1000 schedules, 5 min TTL
        Self::new(1_000, Duration::from_secs(5 * 60))
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub schedules_size: u64,
    pub ttl_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_key_distinguishes_inputs() {
        let id = Uuid::nil();
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let key = AppCache::schedule_key(id, start, 30, 7);
        assert_eq!(
            key,
            "schedule:00000000-0000-0000-0000-000000000000:2025-01-01:30:7"
        );
        assert_ne!(key, AppCache::schedule_key(id, start, 30, 8));
        assert_ne!(key, AppCache::schedule_key(id, start, 31, 7));
    }

    #[tokio::test]
    async fn test_insert_and_invalidate() {
        let cache = AppCache::default();
        let key = AppCache::schedule_key(Uuid::nil(), NaiveDate::MIN, 1, 0);
        cache.schedules.insert(key.clone(), Arc::new(Vec::new())).await;
        assert!(cache.schedules.get(&key).await.is_some());

        cache.invalidate_all();
        assert!(cache.schedules.get(&key).await.is_none());
        assert_eq!(cache.stats().ttl_secs, 300);
    }
}
