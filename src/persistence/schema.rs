use taos::*;

use crate::db::schema::FILTERS_TABLE;
use crate::error::{CatalogError, Result};

/// Create the volume history database and the `filters` super table
pub async fn init_schema(taos: &Taos, database: &str) -> Result<()> {
    let database = database_ident(database)?;
    tracing::info!(database, "Initializing TDengine schema...");

    taos.exec(create_database_sql(database))
        .await
        .map_err(|e| CatalogError::TimeSeries(format!("Failed to create database: {}", e)))?;

    taos.exec(format!("USE {}", database))
        .await
        .map_err(|e| CatalogError::TimeSeries(format!("Failed to use database: {}", e)))?;

    // Rows are written and queried with microsecond timestamps
    match check_database_precision(taos, database).await {
        Ok(precision) if precision == "us" => {
            tracing::info!("TDengine database precision: {}", precision);
        }
        Ok(precision) => {
            tracing::error!(
                "TDengine database precision is '{}', expected 'us'. Drop database {} and retry.",
                precision,
                database
            );
            return Err(CatalogError::TimeSeries(format!(
                "Wrong database precision: '{}', expected 'us'",
                precision
            )));
        }
        Err(e) => {
            tracing::warn!("Could not check database precision: {}", e);
        }
    }

    taos.exec(create_filters_sql(database))
        .await
        .map_err(|e| CatalogError::TimeSeries(format!("Failed to create filters table: {}", e)))?;

    tracing::info!("TDengine schema initialized successfully");
    Ok(())
}

async fn check_database_precision(taos: &Taos, database: &str) -> Result<String> {
    #[derive(serde::Deserialize)]
    struct ShowCreate {
        #[serde(rename = "Create Database")]
        create: String,
    }

    let mut result = taos
        .query(format!("SHOW CREATE DATABASE {}", database))
        .await
        .map_err(|e| CatalogError::TimeSeries(format!("Failed to query database info: {}", e)))?;

    let rows: Vec<ShowCreate> = result
        .deserialize()
        .try_collect()
        .await
        .map_err(|e| CatalogError::TimeSeries(format!("Failed to deserialize: {}", e)))?;

    let create = rows
        .first()
        .map(|row| row.create.to_uppercase())
        .unwrap_or_default();

    Ok(if create.contains("PRECISION 'US'") {
        "us"
    } else if create.contains("PRECISION 'NS'") {
        "ns"
    } else {
        "ms"
    }
    .to_string())
}

/// Database names are interpolated into SQL, so only plain identifiers pass
pub(crate) fn database_ident(database: &str) -> Result<&str> {
    let valid = !database.is_empty()
        && database.len() <= 64
        && database.starts_with(|c: char| c.is_ascii_alphabetic())
        && database.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(database)
    } else {
        Err(CatalogError::Config(format!(
            "invalid TDengine database name '{}'",
            database
        )))
    }
}

fn create_database_sql(database: &str) -> String {
    format!(
        "CREATE DATABASE IF NOT EXISTS {} KEEP 365d DURATION 10d PRECISION 'us'",
        database
    )
}

fn create_filters_sql(database: &str) -> String {
    format!(
        r#"
CREATE STABLE IF NOT EXISTS {}.{} (
    ts TIMESTAMP,
    val DOUBLE,
    address NCHAR(128),
    blockchain NCHAR(64)
) TAGS (
    filter_name NCHAR(32),
    exchange NCHAR(64)
)
"#,
        database, FILTERS_TABLE
    )
}
