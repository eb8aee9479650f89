//! Read path for the 120-minute volume filter series

use alloy_primitives::{hex, keccak256};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use taos::*;

use super::schema::database_ident;
use super::tdengine::TDengineClient;
use crate::db::schema::{FILTERS_TABLE, VOLUME_FILTER};
use crate::error::{CatalogError, Result};
use crate::exchange_info::validation::SeriesLiteral;

/// One point of the volume filter series
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VolumeFilterRow {
    pub address: Option<String>,
    pub blockchain: Option<String>,
    pub val: Option<f64>,
}

/// Source of recent volume filter values
#[async_trait]
pub trait VolumeHistory: Send + Sync {
    /// All `VOL120` points with an empty exchange tag, `since < ts < now`,
    /// in time order
    async fn volume_filter_rows(&self, since: DateTime<Utc>) -> Result<Vec<VolumeFilterRow>>;
}

pub struct TDengineVolumeHistory {
    client: TDengineClient,
    database: String,
}

impl TDengineVolumeHistory {
    pub fn new(client: TDengineClient, database: &str) -> Result<Self> {
        Ok(Self {
            client,
            database: database_ident(database)?.to_string(),
        })
    }

    /// Connect, create the schema if missing and wrap the client
    pub async fn connect(dsn: &str, database: &str) -> Result<Self> {
        let client = TDengineClient::connect(dsn).await?;
        client.init_schema(database).await?;
        Self::new(client, database)
    }

    pub fn client(&self) -> &TDengineClient {
        &self.client
    }

    /// Append one point to the `filter`/`exchange` series
    pub async fn record_filter_value(
        &self,
        filter: &str,
        exchange: &str,
        address: &str,
        blockchain: &str,
        value: f64,
        ts: DateTime<Utc>,
    ) -> Result<()> {
        let filter = SeriesLiteral::new("filter", filter)?;
        let exchange = SeriesLiteral::new("exchange", exchange)?;
        let address = SeriesLiteral::new("address", address)?;
        let blockchain = SeriesLiteral::new("blockchain", blockchain)?;
        if !value.is_finite() {
            return Err(CatalogError::Parse(format!("non-finite filter value {}", value)));
        }

        let sql = format!(
            "INSERT INTO {db}.{sub} USING {db}.{stable} TAGS ('{filter}', '{exchange}') \
             VALUES ({ts}, {value}, '{address}', '{blockchain}')",
            db = self.database,
            sub = subtable_name(filter.as_str(), exchange.as_str()),
            stable = FILTERS_TABLE,
            ts = ts.timestamp_micros(),
        );

        self.client
            .taos()
            .exec(&sql)
            .await
            .map_err(|e| CatalogError::TimeSeries(format!("Failed to insert filter value: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl VolumeHistory for TDengineVolumeHistory {
    async fn volume_filter_rows(&self, since: DateTime<Utc>) -> Result<Vec<VolumeFilterRow>> {
        let sql = rows_sql(&self.database, since);
        tracing::debug!("Querying volume history: {}", sql);

        let mut result = self
            .client
            .taos()
            .query(&sql)
            .await
            .map_err(|e| CatalogError::TimeSeries(format!("Failed to query volume history: {}", e)))?;

        let rows: Vec<VolumeFilterRow> = result
            .deserialize()
            .try_collect()
            .await
            .map_err(|e| CatalogError::TimeSeries(format!("Failed to deserialize: {}", e)))?;

        Ok(rows)
    }
}

/// Child table of the super table holding one (filter, exchange) series.
///
/// Names come from a keccak digest of the length-prefixed pair so that
/// distinct series never share a table and any exchange name fits
/// TDengine's table-name limit. The readable values live in the tags.
fn subtable_name(filter: &str, exchange: &str) -> String {
    let mut input = Vec::with_capacity(8 + filter.len() + exchange.len());
    input.extend_from_slice(&(filter.len() as u64).to_be_bytes());
    input.extend_from_slice(filter.as_bytes());
    input.extend_from_slice(exchange.as_bytes());
    format!("flt_{}", hex::encode(keccak256(&input)))
}

fn rows_sql(database: &str, since: DateTime<Utc>) -> String {
    format!(
        "SELECT address, blockchain, val FROM {}.{} \
         WHERE filter_name = '{}' AND exchange = '' AND ts > {} AND ts < NOW \
         ORDER BY ts ASC",
        database,
        FILTERS_TABLE,
        VOLUME_FILTER,
        since.timestamp_micros()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_subtable_name_is_stable_identifier() {
        let name = subtable_name("VOL120", "Binance.US");
        assert_eq!(name, subtable_name("VOL120", "Binance.US"));
        assert!(name.starts_with("flt_"));
        assert_eq!(name.len(), 4 + 64);
        assert!(name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));

        let long_exchange = "x".repeat(128);
        assert_eq!(subtable_name("VOL120", &long_exchange).len(), 68);
    }

    #[test]
    fn test_subtable_names_are_distinct_per_series() {
        let series = [
            ("VOL120", ""),
            ("vol120", ""),
            ("VOL120", "Binance.US"),
            ("VOL120", "Binance_US"),
            ("VOL120", "binance_us"),
            ("VOL1", "20Binance"),
            ("VOL120", "Binance"),
        ];
        let names: std::collections::HashSet<String> =
            series.iter().map(|(f, e)| subtable_name(f, e)).collect();
        assert_eq!(names.len(), series.len());
    }

    #[test]
    fn test_rows_sql_bounds() {
        let since = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let sql = rows_sql("volumes", since);
        assert!(sql.contains("FROM volumes.filters"));
        assert!(sql.contains("filter_name = 'VOL120'"));
        assert!(sql.contains("exchange = ''"));
        assert!(sql.contains(&format!("ts > {}", since.timestamp_micros())));
    }
}
