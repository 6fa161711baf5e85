//! Configuration management for lifeflow.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "lifeflow";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "donors.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `LIFEFLOW_`, sections split on `__`)
/// 2. TOML config file at `~/.config/lifeflow/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Managed database configuration.
    pub remote: RemoteConfig,
    /// Contact link configuration.
    pub contact: ContactConfig,
}

/// Which store donors live in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Local `SQLite` file.
    #[default]
    Sqlite,
    /// Managed database reached over its REST interface.
    Remote,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Store to use.
    pub backend: Backend,
    /// Path to the database file.
    /// Defaults to `~/.local/share/lifeflow/donors.db`
    pub database_path: Option<PathBuf>,
}

/// Managed database configuration, used when `storage.backend = "remote"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    pub url: String,
    /// Public API key sent with every request.
    #[serde(deserialize_with = "string_or_number")]
    pub api_key: String,
    /// Table holding donors.
    #[serde(deserialize_with = "string_or_number")]
    pub table: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// Contact link configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    /// Country calling code prefixed to local numbers in WhatsApp links.
    #[serde(deserialize_with = "string_or_number")]
    pub country_code: String,
    /// Name used in the pre-filled WhatsApp message.
    pub app_name: String,
}

/// Deserialize a string field that may arrive as a number.
///
/// The environment provider parses `LIFEFLOW_CONTACT__COUNTRY_CODE=977` into
/// an integer; keys and codes made only of digits are still strings here.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrNumber;

    impl de::Visitor<'_> for StringOrNumber {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or an integer")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_string<E: de::Error>(self, value: String) -> std::result::Result<String, E> {
            Ok(value)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_u128<E: de::Error>(self, value: u128) -> std::result::Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_i128<E: de::Error>(self, value: i128) -> std::result::Result<String, E> {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(StringOrNumber)
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            table: "donors".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            country_code: "91".to_string(),
            app_name: "LifeFlow Blood Bank".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("LIFEFLOW_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.backend == Backend::Remote {
            if self.remote.url.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "remote.url is required for the remote backend".to_string(),
                });
            }
            if let Err(e) = url::Url::parse(&self.remote.url) {
                return Err(Error::ConfigValidation {
                    message: format!("remote.url is not a valid URL: {e}"),
                });
            }
            if self.remote.api_key.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "remote.api_key is required for the remote backend".to_string(),
                });
            }
        }

        if self.remote.table.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "remote.table must not be empty".to_string(),
            });
        }

        if self.remote.timeout_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "remote.timeout_secs must be greater than 0".to_string(),
            });
        }

        let code = &self.contact.country_code;
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::ConfigValidation {
                message: format!("contact.country_code must be digits only, got {code:?}"),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the remote request timeout as a Duration.
    #[must_use]
    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote.timeout_secs)
    }
}
