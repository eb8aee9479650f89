//! Exchange symbol repository over the `exchangesymbol` table

use sqlx::PgPool;
use uuid::Uuid;

use super::models::ExchangeSymbol;
use crate::db::schema::{ASSET_TABLE, EXCHANGE_SYMBOL_TABLE};
use crate::error::Result;
use crate::exchange_info::validation::{self, prefix_pattern};

/// Maps exchange tickers to verified assets
#[derive(Clone)]
pub struct ExchangeSymbolRepository {
    pool: PgPool,
}

impl ExchangeSymbolRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record `symbol` on `exchange` unless it is already known
    pub async fn set_exchange_symbol(&self, exchange: &str, symbol: &str) -> Result<()> {
        validation::require_non_empty("exchange", exchange)?;
        validation::require_non_empty("symbol", symbol)?;

        let result = sqlx::query(&format!(
            "INSERT INTO {es} (symbol, exchange) SELECT $1, $2 \
             WHERE NOT EXISTS (SELECT 1 FROM {es} WHERE symbol = $1 AND exchange = $2)",
            es = EXCHANGE_SYMBOL_TABLE
        ))
        .bind(symbol)
        .bind(exchange)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            tracing::debug!(exchange, symbol, "New exchange symbol");
        }
        Ok(())
    }

    /// Full record of `symbol` on `exchange`
    pub async fn get_exchange_symbol(&self, exchange: &str, symbol: &str) -> Result<ExchangeSymbol> {
        let record = sqlx::query_as::<_, ExchangeSymbol>(&format!(
            "SELECT symbol, exchange, verified, asset_id FROM {} WHERE symbol = $1 AND exchange = $2",
            EXCHANGE_SYMBOL_TABLE
        ))
        .bind(symbol)
        .bind(exchange)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Symbols on `exchange` not verified yet, ascending
    pub async fn get_unverified_exchange_symbols(&self, exchange: &str) -> Result<Vec<String>> {
        let symbols = sqlx::query_scalar::<_, String>(&format!(
            "SELECT symbol FROM {} WHERE exchange = $1 AND verified = false ORDER BY symbol ASC",
            EXCHANGE_SYMBOL_TABLE
        ))
        .bind(exchange)
        .fetch_all(&self.pool)
        .await?;

        Ok(symbols)
    }

    /// Symbols traded on `exchange` (all exchanges if empty), optionally
    /// restricted to those starting with `prefix` (case insensitive)
    pub async fn get_exchange_symbols(&self, exchange: &str, prefix: &str) -> Result<Vec<String>> {
        let symbols = match (exchange.is_empty(), prefix.is_empty()) {
            (false, false) => {
                sqlx::query_scalar::<_, String>(&format!(
                    "SELECT symbol FROM {} WHERE exchange = $1 AND symbol ILIKE $2",
                    EXCHANGE_SYMBOL_TABLE
                ))
                .bind(exchange)
                .bind(prefix_pattern(prefix))
                .fetch_all(&self.pool)
                .await?
            }
            (false, true) => {
                sqlx::query_scalar::<_, String>(&format!(
                    "SELECT symbol FROM {} WHERE exchange = $1",
                    EXCHANGE_SYMBOL_TABLE
                ))
                .bind(exchange)
                .fetch_all(&self.pool)
                .await?
            }
            (true, false) => {
                sqlx::query_scalar::<_, String>(&format!(
                    "SELECT symbol FROM {} WHERE symbol ILIKE $1",
                    EXCHANGE_SYMBOL_TABLE
                ))
                .bind(prefix_pattern(prefix))
                .fetch_all(&self.pool)
                .await?
            }
            (true, true) => {
                sqlx::query_scalar::<_, String>(&format!(
                    "SELECT symbol FROM {}",
                    EXCHANGE_SYMBOL_TABLE
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(symbols)
    }

    /// Mark `symbol` on `exchange` as verified and link it to `asset_id`.
    ///
    /// Returns false if no such (symbol, exchange) exists.
    pub async fn verify_exchange_symbol(
        &self,
        exchange: &str,
        symbol: &str,
        asset_id: Uuid,
    ) -> Result<bool> {
        let result = sqlx::query(&format!(
            "UPDATE {} SET verified = true, asset_id = $1 WHERE symbol = $2 AND exchange = $3",
            EXCHANGE_SYMBOL_TABLE
        ))
        .bind(asset_id)
        .bind(symbol)
        .bind(exchange)
        .execute(&self.pool)
        .await?;

        let verified = result.rows_affected() > 0;
        if verified {
            tracing::info!(exchange, symbol, %asset_id, "Verified exchange symbol");
        }
        Ok(verified)
    }

    /// (asset_id, verified) of `symbol` on `exchange`; asset_id is `None`
    /// while the link is unset
    pub async fn get_exchange_symbol_asset_id(
        &self,
        exchange: &str,
        symbol: &str,
    ) -> Result<(Option<Uuid>, bool)> {
        let record = self.get_exchange_symbol(exchange, symbol).await?;
        Ok((record.asset_id, record.verified))
    }

    /// Exchanges on which `symbol` is linked to an asset
    pub async fn get_asset_exchange(&self, symbol: &str) -> Result<Vec<String>> {
        let exchanges = sqlx::query_scalar::<_, String>(&format!(
            "SELECT es.exchange FROM {es} es INNER JOIN {asset} a ON a.asset_id = es.asset_id \
             WHERE es.symbol = $1",
            es = EXCHANGE_SYMBOL_TABLE,
            asset = ASSET_TABLE
        ))
        .bind(symbol)
        .fetch_all(&self.pool)
        .await?;

        Ok(exchanges)
    }
}
