//! Configuration file handling.
//!
//! The configuration file is stored at `$SALES_HOME/config.json`. It is optional: when it does
//! not exist the defaults are used. When it exists it must be valid.

use crate::error::{ErrorType, IntoResult};
use crate::ingest::LoadOptions;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "sales";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const DEFAULT_CURRENCY: &str = "Rp";
const DEFAULT_ALL_PRODUCTS_LABEL: &str = "all";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$SALES_HOME` and from there it loads `$SALES_HOME/config.json` if it exists.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the `$SALES_HOME` directory if needed and writes a default `config.json` into it.
    ///
    /// # Errors
    /// - Returns an error if a config file already exists or if any file operation fails.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::create_inner(dir.into()).pub_result(ErrorType::Config)
    }

    fn create_inner(maybe_relative: PathBuf) -> anyhow::Result<Self> {
        utils::make_dir(&maybe_relative).context("Unable to create the sales home directory")?;
        let root = utils::canonicalize(&maybe_relative)?;
        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!("A config file already exists at '{}'", config_path.display())
        }
        let config_file = ConfigFile::default();
        config_file.save(&config_path)?;
        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    /// Loads `$SALES_HOME/config.json`, or uses the defaults when that file does not exist.
    pub fn load(sales_home: impl Into<PathBuf>) -> Result<Self> {
        let root = sales_home.into();
        let config_path = root.join(CONFIG_JSON);
        let config_file = if config_path.is_file() {
            ConfigFile::load(&config_path).pub_result(ErrorType::Config)?
        } else {
            debug!(
                "No config file at '{}', using defaults",
                config_path.display()
            );
            ConfigFile::default()
        };
        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The prefix used when displaying money, e.g. `Rp`.
    pub fn currency(&self) -> &str {
        &self.config_file.currency
    }

    /// The product-filter value that means "every product".
    pub fn all_products_label(&self) -> &str {
        &self.config_file.all_products_label
    }

    pub fn date_formats(&self) -> &[String] {
        &self.config_file.date_formats
    }

    /// The ingestion settings described by this configuration.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions::default().with_date_formats(self.date_formats().iter().cloned())
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "sales",
///   "config_version": 1,
///   "currency": "Rp",
///   "date_formats": ["%d-%m-%Y"],
///   "all_products_label": "all"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "sales"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Prefix for money values
    #[serde(default = "default_currency")]
    currency: String,

    /// Extra `chrono` date formats tried after the built-in ones
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    date_formats: Vec<String>,

    /// The product-filter value that selects every product
    #[serde(default = "default_all_products_label")]
    all_products_label: String,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_all_products_label() -> String {
    DEFAULT_ALL_PRODUCTS_LABEL.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            currency: default_currency(),
            date_formats: Vec::new(),
            all_products_label: default_all_products_label(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it is not a config file for
    /// this application.
    fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = utils::read(path)?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version == CONFIG_VERSION,
            "Unsupported config_version {} in config file, expected {}",
            config.config_version,
            CONFIG_VERSION
        );
        anyhow::ensure!(
            !config.all_products_label.trim().is_empty(),
            "all_products_label must not be empty"
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(path, data).context("Unable to write config file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[test]
    fn test_config_create_and_load() {
        let env = TestEnv::new();
        let home = env.path("sales_home");
        let created = Config::create(&home).unwrap();
        assert!(created.config_path().is_file());
        assert_eq!(created.currency(), "Rp");

        let loaded = Config::load(created.root()).unwrap();
        assert_eq!(loaded.currency(), "Rp");
        assert_eq!(loaded.all_products_label(), "all");
        assert!(loaded.date_formats().is_empty());
    }

    #[test]
    fn test_config_create_twice_fails() {
        let env = TestEnv::new();
        let home = env.path("h");
        Config::create(&home).unwrap();
        let err = Config::create(&home).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
        assert!(err.message().contains("already exists"));
    }

    #[test]
    fn test_config_missing_file_uses_defaults() {
        let env = TestEnv::new();
        let config = Config::load(env.path("nowhere")).unwrap();
        assert_eq!(config.currency(), DEFAULT_CURRENCY);
        assert_eq!(config.load_options(), LoadOptions::default());
    }

    #[test]
    fn test_config_file_minimal() {
        let env = TestEnv::new();
        env.write(
            CONFIG_JSON,
            r#"{ "app_name": "sales", "config_version": 1, "date_formats": ["%d-%m-%Y"] }"#,
        );
        let config = Config::load(env.path("")).unwrap();
        assert_eq!(config.currency(), "Rp");
        assert_eq!(config.date_formats(), &[String::from("%d-%m-%Y")]);
        assert_eq!(
            config.load_options(),
            LoadOptions::default().with_date_formats(["%d-%m-%Y"])
        );
    }

    #[test]
    fn test_config_file_invalid_app_name() {
        let env = TestEnv::new();
        env.write(CONFIG_JSON, r#"{ "app_name": "ledger", "config_version": 1 }"#);
        let err = Config::load(env.path("")).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
        assert!(err.message().contains("Invalid app_name"));
    }

    #[test]
    fn test_config_file_malformed_json() {
        let env = TestEnv::new();
        env.write(CONFIG_JSON, "{ not json");
        let err = Config::load(env.path("")).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
    }

    #[test]
    fn test_config_file_serialization_omits_empty_date_formats() {
        let json = serde_json::to_string(&ConfigFile::default()).unwrap();
        assert!(!json.contains("date_formats"));
        assert!(json.contains("\"currency\":\"Rp\""));
    }
}
