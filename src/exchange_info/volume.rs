//! Trading volume: the relational 24h figure and the time-series history

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::db::schema::{ASSET_TABLE, ASSET_VOLUME_TABLE};
use crate::error::{CatalogError, Result};
use crate::exchange_info::asset::{Asset, AssetKey, AssetRepository};
use crate::persistence::{VolumeFilterRow, VolumeHistory};

#[derive(Clone)]
pub struct VolumeRepository {
    pool: PgPool,
    assets: AssetRepository,
    history: Option<Arc<dyn VolumeHistory>>,
}

impl VolumeRepository {
    pub fn new(
        pool: PgPool,
        assets: AssetRepository,
        history: Option<Arc<dyn VolumeHistory>>,
    ) -> Self {
        Self {
            pool,
            assets,
            history,
        }
    }

    /// Record the latest 24h volume of `asset`, replacing any previous figure
    pub async fn set_asset_volume_24h(&self, asset: &Asset, volume: f64) -> Result<()> {
        if !volume.is_finite() {
            return Err(CatalogError::Parse(format!("non-finite volume {}", volume)));
        }

        let result = sqlx::query(&format!(
            "INSERT INTO {vol} (asset_id, volume) \
             SELECT asset_id, $3 FROM {asset} WHERE address = $1 AND blockchain = $2 \
             ON CONFLICT (asset_id) DO UPDATE SET volume = EXCLUDED.volume",
            vol = ASSET_VOLUME_TABLE,
            asset = ASSET_TABLE
        ))
        .bind(&asset.address)
        .bind(&asset.blockchain)
        .bind(volume)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::warn!(
                address = %asset.address,
                blockchain = %asset.blockchain,
                "Volume for unknown asset dropped"
            );
            return Err(CatalogError::NotFound);
        }
        Ok(())
    }

    pub async fn get_asset_volume_24h(&self, asset: &Asset) -> Result<f64> {
        let volume = sqlx::query_scalar::<_, f64>(&format!(
            "SELECT v.volume FROM {vol} v INNER JOIN {asset} a ON a.asset_id = v.asset_id \
             WHERE a.address = $1 AND a.blockchain = $2",
            vol = ASSET_VOLUME_TABLE,
            asset = ASSET_TABLE
        ))
        .bind(&asset.address)
        .bind(&asset.blockchain)
        .fetch_one(&self.pool)
        .await?;

        Ok(volume)
    }

    pub async fn get_top_asset_by_volume(&self, symbol: &str) -> Result<Vec<Asset>> {
        self.assets.get_top_asset_by_volume(symbol).await
    }

    /// Assets that had a 120-minute volume filter value since `time_init`,
    /// each listed once in order of first appearance.
    ///
    /// Fails with [`CatalogError::NoRecentVolumeData`] when the series has
    /// no points in the window.
    pub async fn get_assets_with_vol_history(&self, time_init: DateTime<Utc>) -> Result<Vec<AssetKey>> {
        let history = self
            .history
            .as_ref()
            .ok_or_else(|| CatalogError::Config("volume history store not configured".into()))?;

        let rows = history.volume_filter_rows(time_init).await?;
        if rows.is_empty() {
            return Err(CatalogError::NoRecentVolumeData);
        }

        let keys = dedup_asset_keys(rows);
        tracing::debug!(since = %time_init, assets = keys.len(), "Assets with volume history");
        Ok(keys)
    }
}

/// Distinct (address, blockchain) pairs in first-seen order; rows missing
/// either field are skipped
pub fn dedup_asset_keys(rows: impl IntoIterator<Item = VolumeFilterRow>) -> Vec<AssetKey> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter_map(|row| match (row.address, row.blockchain) {
            (Some(address), Some(blockchain)) => Some(AssetKey::new(address, blockchain)),
            _ => None,
        })
        .filter(|key| seen.insert(key.clone()))
        .collect()
}
