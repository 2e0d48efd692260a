//! Application configuration.
//!
//! Process-level knobs live in the TOML file; trading parameters live
//! in the trade store and are loaded by [`crate::settings`]. The
//! optional `[settings]` table seeds an in-memory store for dry runs.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Order book subscription depth.
    #[serde(default = "default_order_book_depth")]
    pub order_book_depth: usize,
    /// Sell sweep interval in milliseconds.
    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,
    /// Seed values for the trade store settings table (dry runs).
    #[serde(default)]
    pub settings: HashMap<String, String>,
}

fn default_order_book_depth() -> usize {
    10
}

fn default_sweep_interval_ms() -> u64 {
    5000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            order_book_depth: default_order_book_depth(),
            sweep_interval_ms: default_sweep_interval_ms(),
            settings: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Load from `SPOTBOT_CONFIG` or the default path.
    pub fn load() -> AppResult<Self> {
        let config_path = std::env::var("SPOTBOT_CONFIG")
            .unwrap_or_else(|_| "config/default.toml".to_string());
        Self::from_file(&config_path)
    }

    /// Load from a specific TOML file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        info!(config_path = %path, "Loading configuration");
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read {path}: {e}")))?;
        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse {path}: {e}")))
    }
}
