//! Configuration schema definitions

use odcaf_search::{DEFAULT_LIMIT, MAX_LIMIT, QueryConfig};
use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub query: QuerySettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Location of the ingested facility table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database file
    #[serde(default = "default_database")]
    pub database: String,

    /// Table holding one row per facility
    #[serde(default = "default_table")]
    pub table: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            table: default_table(),
        }
    }
}

fn default_database() -> String {
    "odcaf.db".to_string()
}

fn default_table() -> String {
    "facilities".to_string()
}

/// Result limits and retrieval bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuerySettings {
    /// Limit used when the caller gives none
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Largest limit a caller may request
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,

    /// Pre-limit cap multiplier for plain filter queries
    #[serde(default = "default_prefetch_factor")]
    pub prefetch_factor: usize,

    /// Pre-limit cap multiplier when a facility type is post-filtered
    #[serde(default = "default_typed_prefetch_factor")]
    pub typed_prefetch_factor: usize,

    /// Ceiling on rows pulled before post-filtering
    #[serde(default = "default_max_prefetch")]
    pub max_prefetch: usize,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            prefetch_factor: default_prefetch_factor(),
            typed_prefetch_factor: default_typed_prefetch_factor(),
            max_prefetch: default_max_prefetch(),
        }
    }
}

impl QuerySettings {
    /// Retrieval bounds for the query engine.
    pub fn engine_config(&self) -> QueryConfig {
        QueryConfig {
            prefetch_factor: self.prefetch_factor,
            typed_prefetch_factor: self.typed_prefetch_factor,
            max_prefetch: self.max_prefetch,
        }
    }
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_max_limit() -> usize {
    MAX_LIMIT
}

fn default_prefetch_factor() -> usize {
    QueryConfig::default().prefetch_factor
}

fn default_typed_prefetch_factor() -> usize {
    QueryConfig::default().typed_prefetch_factor
}

fn default_max_prefetch() -> usize {
    QueryConfig::default().max_prefetch
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    #[serde(default = "default_level")]
    pub level: String,

    /// Include the event target in log lines
    #[serde(default)]
    pub show_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            show_target: false,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}
