//! Exchange symbol models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Ticker as reported by an exchange, pending verification against an asset
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ExchangeSymbol {
    pub symbol: String,
    pub exchange: String,
    pub verified: bool,
    pub asset_id: Option<Uuid>,
}

impl ExchangeSymbol {
    /// Asset link of a verified symbol
    pub fn verified_asset_id(&self) -> Option<Uuid> {
        if self.verified { self.asset_id } else { None }
    }
}
