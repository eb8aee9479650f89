//! Shared handle over every catalog repository

use std::sync::Arc;

use crate::cache::RedisCache;
use crate::config::{CatalogConfig, MemoConfig};
use crate::db::Database;
use crate::error::Result;
use crate::exchange_info::asset::AssetMemo;
use crate::exchange_info::{
    AssetRepository, BlockchainRepository, ExchangePairRepository, ExchangeSymbolRepository,
    VolumeRepository,
};
use crate::persistence::{TDengineVolumeHistory, VolumeHistory};

/// Catalog state (shared)
///
/// Cheap to clone: the pool, the memo and the cache connection are shared.
#[derive(Clone)]
pub struct AssetCatalog {
    database: Database,
    assets: AssetRepository,
    exchange_symbols: ExchangeSymbolRepository,
    exchange_pairs: ExchangePairRepository,
    blockchains: BlockchainRepository,
    volumes: VolumeRepository,
    /// Redis cache (optional)
    cache: Option<RedisCache>,
    /// TDengine volume history (optional)
    history: Option<Arc<dyn VolumeHistory>>,
}

impl AssetCatalog {
    pub fn new(database: Database, page_size: u32, memo: &MemoConfig) -> Self {
        let pool = database.pool().clone();
        let assets = AssetRepository::new(pool.clone(), Arc::new(AssetMemo::from_config(memo)), page_size);

        Self {
            exchange_symbols: ExchangeSymbolRepository::new(pool.clone()),
            exchange_pairs: ExchangePairRepository::new(pool.clone(), assets.clone(), None),
            blockchains: BlockchainRepository::new(pool.clone()),
            volumes: VolumeRepository::new(pool, assets.clone(), None),
            assets,
            database,
            cache: None,
            history: None,
        }
    }

    /// Connect every backend named in `config`
    pub async fn connect(config: &CatalogConfig) -> Result<Self> {
        let database = Database::connect(&config.postgres_url, &config.postgres).await?;
        let mut catalog = Self::new(database, config.page_size, &config.memo);

        if let Some(url) = &config.redis_url {
            let cache = RedisCache::connect(url, catalog.assets.clone()).await?;
            catalog = catalog.with_cache(cache);
        }

        if let Some(history) = &config.volume_history {
            let history =
                TDengineVolumeHistory::connect(&history.tdengine_dsn, &history.database).await?;
            catalog = catalog.with_volume_history(Arc::new(history));
        }

        tracing::info!(
            cache = catalog.cache.is_some(),
            volume_history = catalog.history.is_some(),
            "Asset catalog ready"
        );
        Ok(catalog)
    }

    pub fn with_cache(mut self, cache: RedisCache) -> Self {
        self.exchange_pairs = ExchangePairRepository::new(
            self.database.pool().clone(),
            self.assets.clone(),
            Some(cache.clone()),
        );
        self.cache = Some(cache);
        self
    }

    pub fn with_volume_history(mut self, history: Arc<dyn VolumeHistory>) -> Self {
        self.volumes = VolumeRepository::new(
            self.database.pool().clone(),
            self.assets.clone(),
            Some(history.clone()),
        );
        self.history = Some(history);
        self
    }

    /// Round trip to PostgreSQL and, if configured, Redis
    pub async fn health_check(&self) -> Result<()> {
        let cache = async {
            match &self.cache {
                Some(cache) => cache.ping().await,
                None => Ok(()),
            }
        };
        futures::future::try_join(self.database.health_check(), cache).await?;
        Ok(())
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn assets(&self) -> &AssetRepository {
        &self.assets
    }

    pub fn exchange_symbols(&self) -> &ExchangeSymbolRepository {
        &self.exchange_symbols
    }

    pub fn exchange_pairs(&self) -> &ExchangePairRepository {
        &self.exchange_pairs
    }

    pub fn blockchains(&self) -> &BlockchainRepository {
        &self.blockchains
    }

    pub fn volumes(&self) -> &VolumeRepository {
        &self.volumes
    }

    pub fn cache(&self) -> Option<&RedisCache> {
        self.cache.as_ref()
    }
}
