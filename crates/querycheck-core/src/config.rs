//! Configuration schema (querycheck.toml)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Environment variable that overrides `database.url`
pub const DATABASE_URL_ENV: &str = "DB_URL";

/// Store connection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Store location: a file path or a `sqlite://` URL
    pub url: String,

    /// Open the store read-only
    #[serde(default = "default_read_only")]
    pub read_only: bool,
}

fn default_read_only() -> bool {
    true
}

impl DatabaseConfig {
    /// Create a read-only configuration for a URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            read_only: true,
        }
    }
}

/// Tuning for the query sanity checker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// Minimum positional similarity for a table to be suggested
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Words that trigger the paint usage tip after a failure
    #[serde(default = "default_domain_keywords")]
    pub domain_keywords: Vec<String>,
}

fn default_similarity_threshold() -> f64 {
    0.6
}

fn default_domain_keywords() -> Vec<String> {
    vec!["paint".to_string(), "tinta".to_string()]
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            domain_keywords: default_domain_keywords(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Store connection (for `query` and `inspect`)
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Checker tuning
    #[serde(default)]
    pub checker: CheckerConfig,

    /// Extra synonym -> table entries, merged over the built-in alias table
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Replace the database URL with `DB_URL` when it is set and non-empty
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            self.apply_database_url(&url);
        }
    }

    fn apply_database_url(&mut self, url: &str) {
        if url.trim().is_empty() {
            return;
        }

        match &mut self.database {
            Some(database) => database.url = url.to_string(),
            None => self.database = Some(DatabaseConfig::new(url)),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.checker.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::InvalidValue(format!(
                "checker.similarity_threshold must be between 0 and 1, got {}",
                threshold
            )));
        }

        if let Some((alias, _)) = self.aliases.iter().find(|(_, table)| table.trim().is_empty()) {
            return Err(ConfigError::InvalidValue(format!(
                "alias '{}' maps to an empty table name",
                alias
            )));
        }

        Ok(())
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.database.is_none());
        assert_eq!(config.checker.similarity_threshold, 0.6);
        assert_eq!(config.checker.domain_keywords, vec!["paint", "tinta"]);
        assert!(config.aliases.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_toml(
            r#"
            [database]
            url = "sqlite://catalog.db"

            [checker]
            similarity_threshold = 0.75

            [aliases]
            cores = "paint"
            "#,
        )
        .unwrap();

        let database = config.database.unwrap();
        assert_eq!(database.url, "sqlite://catalog.db");
        assert!(database.read_only);
        assert_eq!(config.checker.similarity_threshold, 0.75);
        assert_eq!(config.checker.domain_keywords, vec!["paint", "tinta"]);
        assert_eq!(config.aliases.get("cores").map(String::as_str), Some("paint"));
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        let result = Config::from_toml("[checker]\nsimilarity_threshold = 1.5\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_rejects_empty_alias_target() {
        let result = Config::from_toml("[aliases]\ntintas = \"\"\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_database_url_override() {
        let mut config = Config::default();
        config.apply_database_url("catalog.db");
        assert_eq!(config.database.as_ref().unwrap().url, "catalog.db");

        config.apply_database_url("  ");
        assert_eq!(config.database.as_ref().unwrap().url, "catalog.db");

        config.apply_database_url("other.db");
        assert_eq!(config.database.unwrap().url, "other.db");
    }

    #[test]
    fn test_config_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("querycheck.toml");

        let mut config = Config::default();
        config.database = Some(DatabaseConfig::new("catalog.db"));
        config.aliases.insert("cores".to_string(), "paint".to_string());
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
