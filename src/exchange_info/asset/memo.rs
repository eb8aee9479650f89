//! Bounded in-process memo for `get_asset`
//!
//! Entries expire after the configured lifespan and the oldest entries are
//! evicted once capacity is reached.

use cached::{Cached, TimedSizedCache};
use std::sync::Mutex;

use super::models::Asset;
use crate::config::MemoConfig;
use crate::db::schema::MEMO_GET_ASSET_PREFIX;

/// Entries are keyed by the (address, blockchain) pair itself
pub struct AssetMemo {
    entries: Mutex<TimedSizedCache<(String, String), Asset>>,
}

impl AssetMemo {
    pub fn new(capacity: usize, ttl_secs: u64) -> Self {
        Self {
            entries: Mutex::new(TimedSizedCache::with_size_and_lifespan(
                capacity.max(1),
                ttl_secs,
            )),
        }
    }

    pub fn from_config(config: &MemoConfig) -> Self {
        Self::new(config.capacity, config.ttl_secs)
    }

    /// Printable form of an entry's key, for logs
    pub fn key(address: &str, blockchain: &str) -> String {
        format!("{}{}_{}", MEMO_GET_ASSET_PREFIX, address, blockchain)
    }

    pub fn get(&self, address: &str, blockchain: &str) -> Option<Asset> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .cache_get(&(address.to_string(), blockchain.to_string()))
            .cloned()
    }

    pub fn insert(&self, address: &str, blockchain: &str, asset: Asset) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.cache_set((address.to_string(), blockchain.to_string()), asset);
    }

    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.cache_size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.cache_clear();
    }
}

impl Default for AssetMemo {
    fn default() -> Self {
        Self::from_config(&MemoConfig::default())
    }
}
