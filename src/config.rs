use serde::{Deserialize, Serialize};
use std::fs;

use crate::error::{CatalogError, Result};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default)]
    pub log: LogConfig,
    /// PostgreSQL connection URL for the asset catalog
    pub postgres_url: String,
    #[serde(default)]
    pub postgres: PostgresConfig,
    /// Redis URL; the cache layer is disabled when absent
    #[serde(default)]
    pub redis_url: Option<String>,
    /// TDengine volume history; disabled when absent
    #[serde(default)]
    pub volume_history: Option<VolumeHistoryConfig>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub memo: MemoConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: "./logs".to_string(),
            log_file: "asset_catalog.log".to_string(),
            use_json: false,
            rotation: "daily".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PostgresConfig {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            max_connections: 50,
            acquire_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VolumeHistoryConfig {
    pub tdengine_dsn: String,
    #[serde(default = "default_history_database")]
    pub database: String,
}

/// Bounds of the in-process `get_asset` memo cache
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MemoConfig {
    pub capacity: usize,
    pub ttl_secs: u64,
}

impl Default for MemoConfig {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            ttl_secs: 300,
        }
    }
}

fn default_page_size() -> u32 {
    100
}

fn default_history_database() -> String {
    "volumes".to_string()
}

impl CatalogConfig {
    /// Load `config/<env>.yaml`
    pub fn load(env: &str) -> Result<Self> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path).map_err(|e| {
            CatalogError::Config(format!("Failed to read config file {}: {}", config_path, e))
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| CatalogError::Config(format!("Failed to parse config yaml: {}", e)))?;
        if config.page_size == 0 {
            return Err(CatalogError::Config("page_size must be positive".into()));
        }
        Ok(config)
    }
}
