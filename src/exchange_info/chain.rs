use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};

use crate::db::schema::{ASSET_TABLE, BLOCKCHAIN_TABLE};
use crate::error::Result;
use crate::exchange_info::asset::Asset;

/// Chain-level metadata from the blockchain table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Blockchain {
    pub name: String,
    /// Unix timestamp (seconds) of the genesis block
    pub genesis_date: i64,
    /// Consensus description, e.g. "proof-of-stake"
    pub verification_mechanism: String,
    pub chain_id: Option<String>,
    /// Only address and symbol are populated on read
    pub native_token: Asset,
}

#[derive(Clone)]
pub struct BlockchainRepository {
    pool: PgPool,
}

impl BlockchainRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert or update `chain` by name.
    ///
    /// The native token is resolved from the asset table by its address on
    /// this chain; an unknown token leaves the link empty.
    pub async fn set_blockchain(&self, chain: &Blockchain) -> Result<()> {
        tracing::debug!(
            name = %chain.name,
            native_token = %chain.native_token.address,
            "Upserting blockchain"
        );

        sqlx::query(&format!(
            r#"
            INSERT INTO {chain} (name, genesisdate, nativetoken_id, verificationmechanism, chain_id)
            VALUES (
                $1, $2,
                (SELECT asset_id FROM {asset} WHERE address = $3 AND blockchain = $1),
                $4, NULLIF($5, '')
            )
            ON CONFLICT (name) DO UPDATE SET
                genesisdate = EXCLUDED.genesisdate,
                verificationmechanism = EXCLUDED.verificationmechanism,
                chain_id = EXCLUDED.chain_id,
                nativetoken_id = EXCLUDED.nativetoken_id
            "#,
            chain = BLOCKCHAIN_TABLE,
            asset = ASSET_TABLE
        ))
        .bind(&chain.name)
        .bind(chain.genesis_date)
        .bind(&chain.native_token.address)
        .bind(&chain.verification_mechanism)
        .bind(chain.chain_id.as_deref().unwrap_or(""))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fetch chain `name` with its native token
    pub async fn get_blockchain(&self, name: &str) -> Result<Blockchain> {
        let row = sqlx::query(&format!(
            r#"
            SELECT b.genesisdate, b.verificationmechanism, b.chain_id, a.address, a.symbol
            FROM {chain} b
            INNER JOIN {asset} a ON b.nativetoken_id = a.asset_id
            WHERE b.name = $1
            "#,
            chain = BLOCKCHAIN_TABLE,
            asset = ASSET_TABLE
        ))
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(Blockchain {
            name: name.to_string(),
            genesis_date: row.try_get("genesisdate")?,
            verification_mechanism: row.try_get("verificationmechanism")?,
            chain_id: row.try_get("chain_id")?,
            native_token: Asset {
                address: row.try_get("address")?,
                symbol: row.try_get("symbol")?,
                blockchain: name.to_string(),
                ..Default::default()
            },
        })
    }

    /// Names of all blockchains present in the asset table, ascending
    pub async fn get_all_blockchains(&self) -> Result<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(&format!(
            "SELECT DISTINCT blockchain FROM {} ORDER BY blockchain ASC",
            ASSET_TABLE
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }
}
