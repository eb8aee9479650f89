//! Catalog error taxonomy
//!
//! Store and cache errors are classified once, at the boundary, so callers
//! can branch on `NotFound`, `DuplicateKey` and `CacheMiss` without digging
//! into driver-specific error types.

use thiserror::Error;

use crate::exchange_info::validation::ValidationError;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Row not found")]
    NotFound,

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Cache miss for key '{0}'")]
    CacheMiss(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("No recent assets with volume in time-series store")]
    NoRecentVolumeData,

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("Cache error: {0}")]
    Cache(#[source] redis::RedisError),

    #[error("Time-series error: {0}")]
    TimeSeries(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    pub fn is_cache_miss(&self) -> bool {
        matches!(self, Self::CacheMiss(_))
    }
}

impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                Self::DuplicateKey(db_err.message().to_string())
            }
            sqlx::Error::Io(e) => Self::Connection(e.to_string()),
            sqlx::Error::Tls(e) => Self::Connection(e.to_string()),
            sqlx::Error::PoolTimedOut => Self::Connection("connection pool timed out".into()),
            sqlx::Error::PoolClosed => Self::Connection("connection pool closed".into()),
            other => Self::Database(other),
        }
    }
}

impl From<redis::RedisError> for CatalogError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error()
            || err.is_connection_refusal()
            || err.is_connection_dropped()
            || err.is_timeout()
        {
            Self::Connection(err.to_string())
        } else {
            Self::Cache(err)
        }
    }
}
