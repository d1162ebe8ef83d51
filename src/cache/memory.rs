use crate::cache::{CacheStats, GainCache};
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Elevation gain per encoded path, held in process until the TTL lapses.
pub struct MemoryGainCache {
    gains: Cache<String, f64>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryGainCache {
    pub fn new(ttl_seconds: u64, max_entries: u64) -> Self {
        MemoryGainCache {
            gains: Cache::builder()
                .time_to_live(Duration::from_secs(ttl_seconds))
                .max_capacity(max_entries)
                .build(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl GainCache for MemoryGainCache {
    async fn get_gain(&self, key: &str) -> Option<f64> {
        let gain = self.gains.get(key).await;
        let counter = if gain.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);

        if let Some(gain_m) = gain {
            tracing::debug!(key = key, gain_m = gain_m, "Elevation gain reused");
        }
        gain
    }

    async fn store_gain(&self, key: &str, gain_m: f64) {
        self.gains.insert(key.to_string(), gain_m).await;
    }

    async fn get_stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;

        CacheStats {
            hits,
            misses,
            hit_rate: if lookups == 0 {
                0.0
            } else {
                hits as f64 * 100.0 / lookups as f64
            },
            entries: self.gains.entry_count(),
        }
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
