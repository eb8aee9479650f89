//! Asset Catalog - relational data access for a financial-asset catalog
//!
//! Assets, exchange symbols and pairs, blockchains and trading volumes in
//! PostgreSQL, with a Redis cache and a TDengine volume history.
//!
//! # Modules
//!
//! - [`config`] - YAML configuration
//! - [`logging`] - tracing subscriber setup
//! - [`error`] - `CatalogError` and the crate `Result`
//! - [`db`] - PostgreSQL pool and table names
//! - [`exchange_info`] - Asset, symbol, pair, blockchain and volume repositories
//! - [`cache`] - Redis read-through cache
//! - [`persistence`] - TDengine client and volume history
//! - [`catalog`] - `AssetCatalog`, one handle over all of the above

pub mod cache;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod exchange_info;
pub mod logging;
pub mod persistence;

// Convenient re-exports at crate root
pub use cache::RedisCache;
pub use catalog::AssetCatalog;
pub use config::CatalogConfig;
pub use db::Database;
pub use error::{CatalogError, Result};
pub use exchange_info::{
    Asset, AssetClass, AssetFilter, AssetKey, AssetPage, AssetRepository, Blockchain,
    BlockchainRepository, ExchangePair, ExchangePairRepository, ExchangeSymbol,
    ExchangeSymbolRepository, Pair, PairLinkage, VolumeRepository,
};
pub use persistence::{TDengineClient, TDengineVolumeHistory, VolumeHistory};
