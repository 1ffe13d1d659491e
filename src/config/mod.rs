use crate::constants::env_vars;
use crate::constants::storage::LOG_FILE;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

pub mod paths;
pub mod validation;

use paths::{get_catalog_path, get_config_path, get_database_path, get_log_dir_path};
use validation::validate_config;

/// Configuration structure for the application.
/// Handles loading, saving, and managing application settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// SQLite file holding competitions and category executions.
    #[serde(default = "get_database_path")]
    pub database_path: String,
    /// JSON file with categories and their rosters.
    #[serde(default = "get_catalog_path")]
    pub catalog_path: String,
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: get_database_path(),
            catalog_path: get_catalog_path(),
            log_file_path: None,
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location.
    /// A missing file yields the defaults; nothing is written.
    /// Environment variables can override config file values.
    ///
    /// # Environment Variables
    /// - `TABELLONE_DATABASE` - Override database path
    /// - `TABELLONE_CATALOG` - Override catalog path
    /// - `TABELLONE_LOG_FILE` - Override log file path
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded configuration
    /// * `Err(AppError)` - Unreadable or invalid config file
    pub async fn load() -> Result<Self, AppError> {
        let config_path = get_config_path();

        let mut config = if Path::new(&config_path).exists() {
            Self::load_from_path(&config_path).await?
        } else {
            debug!("No config file at {config_path}, using defaults");
            Config::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Replaces fields for which `lookup` returns a non-empty value
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(database_path) = value(env_vars::DATABASE) {
            self.database_path = database_path;
        }
        if let Some(catalog_path) = value(env_vars::CATALOG) {
            self.catalog_path = catalog_path;
        }
        if let Some(log_file_path) = value(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(&self.database_path, &self.catalog_path, &self.log_file_path)
    }

    /// Saves current configuration to the default config file location.
    pub async fn save(&self) -> Result<(), AppError> {
        let config_path = get_config_path();
        self.save_to_path(&config_path).await
    }

    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays current configuration settings to stdout.
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();
        let config = Config::load().await?;

        println!("\nCurrent Configuration");
        println!("────────────────────────────────────");
        println!("Config Location:");
        println!("{config_path}");
        if !Path::new(&config_path).exists() {
            println!("(Not created, using defaults)");
        }
        println!("────────────────────────────────────");
        println!("Database:");
        println!("{}", config.database_path);
        println!("────────────────────────────────────");
        println!("Category Catalog:");
        println!("{}", config.catalog_path);
        println!("────────────────────────────────────");
        println!("Log File Location:");
        if let Some(custom_path) = &config.log_file_path {
            println!("{custom_path}");
        } else {
            println!("{log_dir}/{LOG_FILE}");
            println!("(Default location)");
        }

        Ok(())
    }

    /// Saves configuration to a custom file path.
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    /// * `AppError::Config` - If the provided path has no parent directory
    /// * `AppError::Io` - If there's an I/O error creating directories or writing the file
    /// * `AppError::TomlSerialize` - If there's an error serializing the configuration
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }
        let content = toml::to_string_pretty(self)?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a custom file path, without env overrides
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_config_load_existing_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_path_str = config_path.to_string_lossy();

        let config_content = r#"
database_path = "/data/gara.sqlite"
catalog_path = "/data/categorie.json"
log_file_path = "/custom/log/path"
"#;
        tokio::fs::write(&config_path, config_content)
            .await
            .unwrap();

        let config = Config::load_from_path(&config_path_str).await.unwrap();

        assert_eq!(config.database_path, "/data/gara.sqlite");
        assert_eq!(config.catalog_path, "/data/categorie.json");
        assert_eq!(config.log_file_path, Some("/custom/log/path".to_string()));
    }

    #[tokio::test]
    async fn test_config_missing_fields_use_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_path_str = config_path.to_string_lossy();
        tokio::fs::write(&config_path, "catalog_path = \"cat.json\"\n")
            .await
            .unwrap();

        let config = Config::load_from_path(&config_path_str).await.unwrap();

        assert_eq!(config.catalog_path, "cat.json");
        assert_eq!(config.database_path, get_database_path());
        assert_eq!(config.log_file_path, None);
    }

    #[tokio::test]
    async fn test_config_malformed_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        tokio::fs::write(&config_path, "database_path = [").await.unwrap();
        let result = Config::load_from_path(&config_path.to_string_lossy()).await;
        assert!(matches!(result, Err(AppError::TomlDeserialize(_))));
    }

    #[tokio::test]
    async fn test_config_save_creates_directory_and_roundtrips() {
        let temp_dir = tempdir().unwrap();
        let config_dir = temp_dir.path().join("tabellone");
        let config_path = config_dir.join("config.toml");
        let config_path_str = config_path.to_string_lossy();
        let original = Config {
            database_path: "/data/gara.sqlite".to_string(),
            catalog_path: "/data/categorie.json".to_string(),
            log_file_path: Some("/custom/log/path".to_string()),
        };
        original.save_to_path(&config_path_str).await.unwrap();
        assert!(config_dir.exists());

        let content = tokio::fs::read_to_string(&config_path).await.unwrap();
        assert!(
            content.contains("database_path") && content.contains("/data/gara.sqlite"),
            "Content should contain database_path. Content: {content}"
        );

        let loaded = Config::load_from_path(&config_path_str).await.unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (env_vars::DATABASE, "/tmp/override.sqlite"),
            (env_vars::LOG_FILE, "/tmp/override.log"),
            (env_vars::CATALOG, "  "),
        ]);
        let mut config = Config::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.database_path, "/tmp/override.sqlite");
        assert_eq!(config.log_file_path, Some("/tmp/override.log".to_string()));
        // blank values are ignored
        assert_eq!(config.catalog_path, get_catalog_path());
    }

    #[test]
    fn test_get_config_path() {
        let config_path = Config::get_config_path();
        assert!(config_path.contains("tabellone"));
        assert!(config_path.ends_with("config.toml"));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }
}
