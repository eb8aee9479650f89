//! Exchange pair models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::exchange_info::asset::Asset;

/// Base and quote asset of a trading pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub quote_token: Asset,
    pub base_token: Asset,
}

/// Trading pair as reported by an exchange.
///
/// `foreign_name` is the exchange's own ticker (e.g. `XXBTZUSD`), `symbol`
/// the base symbol it was mapped to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangePair {
    pub symbol: String,
    pub foreign_name: String,
    pub exchange: String,
    pub verified: bool,
    pub underlying_pair: Pair,
}

/// Result of resolving one side of a pair to an asset_id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    Linked(Uuid),
    Unresolved(String),
}

impl LinkOutcome {
    pub fn is_linked(&self) -> bool {
        matches!(self, Self::Linked(_))
    }
}

/// Write-through outcome of `set_exchange_pair`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheWrite {
    Skipped,
    Written,
    Failed(String),
}

/// Best-effort report of `set_exchange_pair`.
///
/// The pair row and its verified flag are always written when this is
/// returned; the asset links and the cache entry may not be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairLinkage {
    pub base: LinkOutcome,
    pub quote: LinkOutcome,
    pub cache: CacheWrite,
}

impl PairLinkage {
    pub fn is_fully_linked(&self) -> bool {
        self.base.is_linked() && self.quote.is_linked()
    }

    pub fn is_complete(&self) -> bool {
        self.is_fully_linked() && !matches!(self.cache, CacheWrite::Failed(_))
    }
}
