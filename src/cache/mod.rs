//! Redis read-through cache for assets and exchange pairs
//!
//! Values are JSON documents stored without expiry under
//! `asset:<asset_id>` and `exchangepair:<exchange>_<foreign_name>`.

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use uuid::Uuid;

use crate::db::schema::{KEY_ASSET_CACHE, KEY_EXCHANGE_PAIR_CACHE};
use crate::error::{CatalogError, Result};
use crate::exchange_info::asset::{Asset, AssetRepository};
use crate::exchange_info::pair::ExchangePair;

const SCAN_BATCH: usize = 500;

#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    assets: AssetRepository,
}

impl RedisCache {
    pub fn new(conn: ConnectionManager, assets: AssetRepository) -> Self {
        Self { conn, assets }
    }

    /// Open a managed connection to `url`
    pub async fn connect(url: &str, assets: AssetRepository) -> Result<Self> {
        let client = Client::open(url)
            .map_err(|e| CatalogError::Config(format!("Failed to create Redis client: {}", e)))?;
        let conn = ConnectionManager::new(client).await?;
        tracing::info!("Connected to Redis");
        Ok(Self::new(conn, assets))
    }

    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        redis::cmd("PING").query_async::<String>(&mut conn).await?;
        Ok(())
    }

    /// Cache `asset` under its asset_id; the asset must already be stored
    pub async fn set_asset_cache(&self, asset: &Asset) -> Result<()> {
        let asset_id = self.assets.get_asset_id(asset).await?;
        let value = serde_json::to_string(asset)?;

        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(asset_cache_key(asset_id), value)
            .await
            .map_err(|e| {
                tracing::error!(%asset_id, "Error setting asset cache: {}", e);
                CatalogError::from(e)
            })
    }

    pub async fn get_asset_cache(&self, asset_id: Uuid) -> Result<Asset> {
        let key = asset_cache_key(asset_id);
        let value = self.get_json(&key).await?;
        Ok(serde_json::from_str(&value)?)
    }

    /// Number of cached assets.
    ///
    /// Walks the whole keyspace with SCAN, so cost grows with the cache size.
    pub async fn count_cache(&self) -> Result<u32> {
        let mut conn = self.conn.clone();
        let pattern = format!("{}*", KEY_ASSET_CACHE);
        let mut cursor: u64 = 0;
        let mut count: u32 = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;
            count = count.saturating_add(u32::try_from(keys.len()).unwrap_or(u32::MAX));
            if next == 0 {
                break;
            }
            cursor = next;
        }

        Ok(count)
    }

    pub async fn set_exchange_pair_cache(&self, exchange: &str, pair: &ExchangePair) -> Result<()> {
        let key = exchange_pair_cache_key(exchange, &pair.foreign_name);
        let value = serde_json::to_string(pair)?;

        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(&key, value).await.map_err(|e| {
            tracing::error!(%key, "Error setting exchange pair cache: {}", e);
            CatalogError::from(e)
        })
    }

    pub async fn get_exchange_pair_cache(
        &self,
        exchange: &str,
        foreign_name: &str,
    ) -> Result<ExchangePair> {
        let key = exchange_pair_cache_key(exchange, foreign_name);
        let value = self.get_json(&key).await?;
        Ok(serde_json::from_str(&value)?)
    }

    async fn get_json(&self, key: &str) -> Result<String> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await.map_err(|e| {
            tracing::error!(key, "Error getting cache entry: {}", e);
            CatalogError::from(e)
        })?;
        value.ok_or_else(|| CatalogError::CacheMiss(key.to_string()))
    }
}

pub fn asset_cache_key(asset_id: Uuid) -> String {
    format!("{}{}", KEY_ASSET_CACHE, asset_id)
}

pub fn exchange_pair_cache_key(exchange: &str, foreign_name: &str) -> String {
    format!("{}{}_{}", KEY_EXCHANGE_PAIR_CACHE, exchange, foreign_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_cache_key() {
        let id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_eq!(asset_cache_key(id), "asset:67e55044-10b1-426f-9247-bb680e5fe0c8");
    }

    #[test]
    fn test_exchange_pair_cache_key() {
        assert_eq!(
            exchange_pair_cache_key("Binance", "BTCUSDT"),
            "exchangepair:Binance_BTCUSDT"
        );
    }
}
