mod memory;

pub use memory::MemoryGainCache;

use async_trait::async_trait;
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub entries: u64,
}

/// Memo of elevation gain per encoded path.
///
/// Lookups and inserts never fail; an unavailable cache behaves as a miss.
#[async_trait]
pub trait GainCache: Send + Sync {
    async fn get_gain(&self, key: &str) -> Option<f64>;

    async fn store_gain(&self, key: &str, gain_m: f64);

    async fn get_stats(&self) -> CacheStats;

    fn backend_name(&self) -> &'static str;
}

/// Cache key for an encoded path. Paths run to kilobytes, keys stay short.
pub fn gain_cache_key(encoded_path: &str) -> String {
    let mut hasher = DefaultHasher::new();
    encoded_path.hash(&mut hasher);
    format!("gain:{:x}:{}", hasher.finish(), encoded_path.len())
}
