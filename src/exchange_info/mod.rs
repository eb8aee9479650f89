//! Exchange information module
//!
//! Repositories over the relational catalog:
//! - Assets (on-chain tokens and fiat currencies)
//! - Exchange symbols and exchange pairs
//! - Blockchains and trading volume

pub mod asset;
pub mod chain;
pub mod pair;
pub mod symbol;
pub mod validation;
pub mod volume;

// Re-export commonly used types
pub use asset::{Asset, AssetClass, AssetFilter, AssetKey, AssetPage, AssetRepository};
pub use chain::{Blockchain, BlockchainRepository};
pub use pair::{ExchangePair, ExchangePairRepository, Pair, PairLinkage};
pub use symbol::{ExchangeSymbol, ExchangeSymbolRepository};
pub use validation::ValidationError;
pub use volume::VolumeRepository;
