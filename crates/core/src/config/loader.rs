//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result, ResultExt};
use std::path::Path;

/// Environment variable overriding `store.database`.
pub const DATABASE_ENV: &str = "ODCAF_DB";

/// Configuration wrapper
///
/// The derived default carries the built-in settings and no file path.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    ///
    /// An explicit path must exist; the standard locations are optional.
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(p) = path {
            if !Path::new(p).exists() {
                return Err(Error::config_not_found(p));
            }
        }

        let config_path = path.map(String::from).or_else(find_config_file);

        let mut schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        if let Ok(db) = std::env::var(DATABASE_ENV) {
            if !db.trim().is_empty() {
                schema.store.database = db;
            }
        }

        let config = Self {
            schema,
            path: config_path,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engine cannot honor.
    pub fn validate(&self) -> Result<()> {
        let query = &self.schema.query;
        if query.default_limit > query.max_limit {
            return Err(Error::invalid_config(
                "query.default_limit",
                format!(
                    "{} is above query.max_limit ({})",
                    query.default_limit, query.max_limit
                ),
            ));
        }
        if query.prefetch_factor == 0 || query.typed_prefetch_factor == 0 {
            return Err(Error::invalid_config(
                "query.prefetch_factor",
                "prefetch factors must be at least 1",
            ));
        }
        let table = &self.schema.store.table;
        if table.is_empty() || !table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(Error::invalid_config(
                "store.table",
                format!("{table:?} is not a plain identifier"),
            ));
        }
        Ok(())
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<String> {
    let candidates = [".odcaf.toml", "odcaf.toml", ".config/odcaf.toml"];

    for candidate in candidates {
        if Path::new(candidate).exists() {
            return Some(candidate.to_string());
        }
    }

    None
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &str) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .context(format!("Failed to read config file {}", path))?;

    toml::from_str(&content).context(format!("Failed to parse config file {}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config: Config = Default::default();
        assert!(config.path.is_none());
        assert_eq!(config.schema.query.default_limit, 20);
        assert_eq!(config.schema.store.table, "facilities");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_load_missing_explicit_file() {
        let err = Config::load(Some("/definitely/not/here/odcaf.toml")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_config_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[query]\nmax_limit = 50\ndefault_limit = 5\n\n[logging]\nlevel = \"debug\"").unwrap();

        let config = load_config_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.query.max_limit, 50);
        assert_eq!(config.query.default_limit, 5);
        assert_eq!(config.query.prefetch_factor, 10);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.store.database, "odcaf.db");
    }

    #[test]
    fn test_config_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[query\nmax_limit = ").unwrap();
        let err = load_config_file(file.path().to_str().unwrap()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigParseError);
        assert!(err.context.is_some());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.schema.query.default_limit = 5000;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.schema.store.table = "facilities; --".into();
        assert!(config.validate().is_err());
    }
}
