//! Asset models and filters

use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::error::{CatalogError, Result};
use crate::exchange_info::validation::normalize_address;

/// Blockchain name under which fiat currencies are stored
pub const FIAT_BLOCKCHAIN: &str = "Fiat";

/// A token on a blockchain, or a fiat currency.
///
/// Uniquely identified by (address, blockchain); fiat assets by symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    pub symbol: String,
    pub name: String,
    pub address: String,
    pub decimals: u8,
    pub blockchain: String,
}

/// Whether an asset lives on a chain or is a fiat currency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetClass {
    OnChain,
    Fiat,
}

impl Asset {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        decimals: u8,
        blockchain: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            address: address.into(),
            decimals,
            blockchain: blockchain.into(),
        }
    }

    /// Fiat currency; `code` (e.g. ISO 4217 "840") takes the place of the address
    pub fn fiat(
        symbol: impl Into<String>,
        name: impl Into<String>,
        code: impl Into<String>,
        decimals: u8,
    ) -> Self {
        Self::new(symbol, name, code, decimals, FIAT_BLOCKCHAIN)
    }

    pub fn class(&self) -> AssetClass {
        if self.blockchain == FIAT_BLOCKCHAIN {
            AssetClass::Fiat
        } else {
            AssetClass::OnChain
        }
    }

    pub fn key(&self) -> AssetKey {
        AssetKey {
            address: self.address.clone(),
            blockchain: self.blockchain.clone(),
        }
    }
}

/// External identity of an asset
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetKey {
    pub address: String,
    pub blockchain: String,
}

impl AssetKey {
    pub fn new(address: impl Into<String>, blockchain: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            blockchain: blockchain.into(),
        }
    }
}

/// One page of assets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetPage {
    pub assets: Vec<Asset>,
    pub has_next_page: bool,
}

/// Conjunctive filter for `identify_asset`.
///
/// Every `Some` field becomes an equality criterion. `decimals: Some(0)` is a
/// real criterion; use `None` to leave it out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetFilter {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub decimals: Option<u8>,
    pub blockchain: Option<String>,
}

impl AssetFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn decimals(mut self, decimals: u8) -> Self {
        self.decimals = Some(decimals);
        self
    }

    pub fn blockchain(mut self, blockchain: impl Into<String>) -> Self {
        self.blockchain = Some(blockchain.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.criteria().is_empty()
    }

    /// (column, value) pairs in a fixed column order; the address is
    /// normalised and decimals rendered as stored (text)
    pub fn criteria(&self) -> Vec<(&'static str, String)> {
        let mut criteria = Vec::new();
        if let Some(symbol) = &self.symbol {
            criteria.push(("symbol", symbol.clone()));
        }
        if let Some(name) = &self.name {
            criteria.push(("name", name.clone()));
        }
        if let Some(address) = &self.address {
            criteria.push(("address", normalize_address(address)));
        }
        if let Some(decimals) = self.decimals {
            criteria.push(("decimals", decimals.to_string()));
        }
        if let Some(blockchain) = &self.blockchain {
            criteria.push(("blockchain", blockchain.clone()));
        }
        criteria
    }
}

/// Legacy zero-value semantics: empty strings and `decimals == 0` are
/// treated as "not specified".
impl From<&Asset> for AssetFilter {
    fn from(asset: &Asset) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            symbol: non_empty(&asset.symbol),
            name: non_empty(&asset.name),
            address: non_empty(&asset.address),
            decimals: (asset.decimals != 0).then_some(asset.decimals),
            blockchain: non_empty(&asset.blockchain),
        }
    }
}

/// Parse the textual decimals column
pub fn parse_decimals(raw: &str) -> Result<u8> {
    raw.trim()
        .parse::<u8>()
        .map_err(|e| CatalogError::Parse(format!("invalid decimals '{}': {}", raw, e)))
}

/// Map a row projecting `symbol, name, address, decimals, blockchain`
pub(crate) fn asset_from_row(row: &PgRow) -> Result<Asset> {
    let decimals: String = row.try_get("decimals")?;
    Ok(Asset {
        symbol: row.try_get("symbol")?,
        name: row.try_get("name")?,
        address: row.try_get("address")?,
        decimals: parse_decimals(&decimals)?,
        blockchain: row.try_get("blockchain")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wbtc() -> Asset {
        Asset::new(
            "WBTC",
            "Wrapped BTC",
            "0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599",
            8,
            "Ethereum",
        )
    }

    #[test]
    fn test_asset_class() {
        assert_eq!(wbtc().class(), AssetClass::OnChain);
        assert_eq!(Asset::fiat("USD", "United States Dollar", "840", 2).class(), AssetClass::Fiat);
    }

    #[test]
    fn test_fiat_constructor() {
        let usd = Asset::fiat("USD", "United States Dollar", "840", 2);
        assert_eq!(usd.blockchain, FIAT_BLOCKCHAIN);
        assert_eq!(usd.address, "840");
    }

    #[test]
    fn test_asset_key() {
        let key = wbtc().key();
        assert_eq!(key, AssetKey::new("0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599", "Ethereum"));
    }

    #[test]
    fn test_parse_decimals_accepts_zero() {
        assert_eq!(parse_decimals("0").unwrap(), 0);
        assert_eq!(parse_decimals("18").unwrap(), 18);
        assert_eq!(parse_decimals(" 6 ").unwrap(), 6);
    }

    #[test]
    fn test_parse_decimals_rejects_garbage() {
        assert!(matches!(parse_decimals("eight"), Err(CatalogError::Parse(_))));
        assert!(matches!(parse_decimals("256"), Err(CatalogError::Parse(_))));
        assert!(matches!(parse_decimals(""), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_filter_criteria_order_and_normalisation() {
        let filter = AssetFilter::new()
            .blockchain("Ethereum")
            .decimals(8)
            .address("0x2260fac5e5542a773aa44fbcfedf7c193bc2c599")
            .symbol("WBTC");

        let criteria = filter.criteria();
        assert_eq!(
            criteria,
            vec![
                ("symbol", "WBTC".to_string()),
                ("address", "0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599".to_string()),
                ("decimals", "8".to_string()),
                ("blockchain", "Ethereum".to_string()),
            ]
        );
    }

    #[test]
    fn test_filter_zero_decimals_is_a_criterion() {
        let filter = AssetFilter::new().decimals(0);
        assert_eq!(filter.criteria(), vec![("decimals", "0".to_string())]);
        assert!(!filter.is_empty());
    }

    #[test]
    fn test_filter_from_asset_uses_zero_value_semantics() {
        let asset = Asset {
            symbol: "SNGLS".to_string(),
            decimals: 0,
            ..Default::default()
        };
        let filter = AssetFilter::from(&asset);
        assert_eq!(filter, AssetFilter::new().symbol("SNGLS"));
    }

    #[test]
    fn test_empty_filter() {
        assert!(AssetFilter::new().is_empty());
        assert!(AssetFilter::from(&Asset::default()).is_empty());
    }

    #[test]
    fn test_asset_serde_roundtrip_keeps_zero_decimals() {
        let asset = Asset::new("TRXC", "TronClassic", "0xabc", 0, "Ethereum");
        let json = serde_json::to_string(&asset).unwrap();
        let back: Asset = serde_json::from_str(&json).unwrap();
        assert_eq!(back, asset);
        assert_eq!(back.decimals, 0);
    }
}
