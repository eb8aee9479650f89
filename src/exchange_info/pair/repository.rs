//! Exchange pair repository over the `exchangepair` table

use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::models::{CacheWrite, ExchangePair, LinkOutcome, PairLinkage};
use crate::cache::RedisCache;
use crate::db::schema::EXCHANGE_PAIR_TABLE;
use crate::error::Result;
use crate::exchange_info::asset::{Asset, AssetRepository};
use crate::exchange_info::validation;

/// Maps exchange trading pairs to their underlying base and quote assets
#[derive(Clone)]
pub struct ExchangePairRepository {
    pool: PgPool,
    assets: AssetRepository,
    cache: Option<RedisCache>,
}

impl ExchangePairRepository {
    pub fn new(pool: PgPool, assets: AssetRepository, cache: Option<RedisCache>) -> Self {
        Self {
            pool,
            assets,
            cache,
        }
    }

    /// Pair `foreign_name` on `exchange` with its underlying assets resolved.
    ///
    /// Unset links yield default assets.
    pub async fn get_exchange_pair(&self, exchange: &str, foreign_name: &str) -> Result<ExchangePair> {
        let row = sqlx::query(&format!(
            "SELECT symbol, verified, id_quotetoken, id_basetoken FROM {} \
             WHERE exchange = $1 AND foreignname = $2",
            EXCHANGE_PAIR_TABLE
        ))
        .bind(exchange)
        .bind(foreign_name)
        .fetch_one(&self.pool)
        .await?;

        let quote_id: Option<Uuid> = row.try_get("id_quotetoken")?;
        let base_id: Option<Uuid> = row.try_get("id_basetoken")?;

        let mut pair = ExchangePair {
            symbol: row.try_get("symbol")?,
            foreign_name: foreign_name.to_string(),
            exchange: exchange.to_string(),
            verified: row.try_get("verified")?,
            ..Default::default()
        };

        if let Some(id) = quote_id {
            pair.underlying_pair.quote_token = self.assets.get_asset_by_id(id).await?;
        }
        if let Some(id) = base_id {
            pair.underlying_pair.base_token = self.assets.get_asset_by_id(id).await?;
        }

        Ok(pair)
    }

    /// (symbol, foreign_name) of every pair on `exchange`
    pub async fn get_exchange_pair_symbols(&self, exchange: &str) -> Result<Vec<ExchangePair>> {
        let rows = sqlx::query(&format!(
            "SELECT symbol, foreignname FROM {} WHERE exchange = $1",
            EXCHANGE_PAIR_TABLE
        ))
        .bind(exchange)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<ExchangePair> {
                Ok(ExchangePair {
                    symbol: row.try_get("symbol")?,
                    foreign_name: row.try_get("foreignname")?,
                    exchange: exchange.to_string(),
                    ..Default::default()
                })
            })
            .collect()
    }

    /// Store `pair` for `exchange` and link it to its underlying assets.
    ///
    /// The pair row is inserted if the (symbol, foreign_name, exchange) triple
    /// is new. Base and quote links are then set independently; an asset that
    /// cannot be resolved leaves its link untouched and is reported in the
    /// returned [`PairLinkage`]. With `cache`, the pair is also written to the
    /// cache layer, whose failure is reported but never returned as an error.
    pub async fn set_exchange_pair(
        &self,
        exchange: &str,
        pair: &ExchangePair,
        cache: bool,
    ) -> Result<PairLinkage> {
        validation::require_non_empty("exchange", exchange)?;
        validation::require_non_empty("foreign_name", &pair.foreign_name)?;

        sqlx::query(&format!(
            "INSERT INTO {ep} (symbol, foreignname, exchange) SELECT $1, $2, $3 \
             WHERE NOT EXISTS (SELECT 1 FROM {ep} WHERE symbol = $1 AND foreignname = $2 AND exchange = $3)",
            ep = EXCHANGE_PAIR_TABLE
        ))
        .bind(&pair.symbol)
        .bind(&pair.foreign_name)
        .bind(exchange)
        .execute(&self.pool)
        .await?;

        let base = self
            .link_token(exchange, &pair.foreign_name, "id_basetoken", &pair.underlying_pair.base_token)
            .await?;
        let quote = self
            .link_token(exchange, &pair.foreign_name, "id_quotetoken", &pair.underlying_pair.quote_token)
            .await?;

        sqlx::query(&format!(
            "UPDATE {} SET verified = $1 WHERE foreignname = $2 AND exchange = $3",
            EXCHANGE_PAIR_TABLE
        ))
        .bind(pair.verified)
        .bind(&pair.foreign_name)
        .bind(exchange)
        .execute(&self.pool)
        .await?;

        let cache = if cache {
            self.write_through(exchange, pair).await
        } else {
            CacheWrite::Skipped
        };

        Ok(PairLinkage { base, quote, cache })
    }

    async fn link_token(
        &self,
        exchange: &str,
        foreign_name: &str,
        column: &'static str,
        token: &Asset,
    ) -> Result<LinkOutcome> {
        let asset_id = match self.assets.get_asset_id(token).await {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(
                    exchange,
                    foreign_name,
                    column,
                    address = %token.address,
                    blockchain = %token.blockchain,
                    "Could not resolve pair asset: {}",
                    e
                );
                return Ok(LinkOutcome::Unresolved(e.to_string()));
            }
        };

        sqlx::query(&format!(
            "UPDATE {} SET {} = $1 WHERE foreignname = $2 AND exchange = $3",
            EXCHANGE_PAIR_TABLE, column
        ))
        .bind(asset_id)
        .bind(foreign_name)
        .bind(exchange)
        .execute(&self.pool)
        .await?;

        Ok(LinkOutcome::Linked(asset_id))
    }

    async fn write_through(&self, exchange: &str, pair: &ExchangePair) -> CacheWrite {
        let Some(cache) = &self.cache else {
            tracing::warn!(exchange, foreign_name = %pair.foreign_name, "Pair cache requested but no cache configured");
            return CacheWrite::Failed("cache layer not configured".to_string());
        };

        let cached = ExchangePair {
            exchange: exchange.to_string(),
            ..pair.clone()
        };
        match cache.set_exchange_pair_cache(exchange, &cached).await {
            Ok(()) => CacheWrite::Written,
            Err(e) => {
                tracing::error!(
                    "setting pair {} to redis for exchange {}: {}",
                    pair.foreign_name,
                    exchange,
                    e
                );
                CacheWrite::Failed(e.to_string())
            }
        }
    }
}
