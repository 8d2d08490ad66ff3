//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings.
//! Configuration is loaded from a TOML file; the remote API key is read from
//! the `DUKKAN_REMOTE_API_KEY` environment variable only.
//!
//! # Example
//!
//! ```no_run
//! use dukkan::infrastructure::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("dukkan.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use url::Url;

use super::access::AccessConfig;
use super::logging::LoggingConfig;
use super::persistence::PersistenceConfig;
use crate::adapter::outbound::rest::API_KEY_ENV;
use crate::domain::PermissionTable;
use crate::error::{ConfigError, Result};

/// Main application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Persistence strategy and backend settings.
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Permission table overrides.
    #[serde(default)]
    pub access: AccessConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// malformed, or validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load `path` if it exists, otherwise use defaults.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`] when the file exists.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            return Self::load(path);
        }
        let mut config = Self::default();
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        // Never from the config file.
        self.persistence.remote.api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty());
    }

    fn validate(&self) -> Result<()> {
        let strategy = self.persistence.strategy;

        if strategy.uses_local() && self.persistence.local.path.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "persistence.local.path",
            }
            .into());
        }

        if strategy.uses_remote() {
            let base_url = self.persistence.remote.base_url.trim();
            if base_url.is_empty() {
                return Err(ConfigError::MissingField {
                    field: "persistence.remote.base_url",
                }
                .into());
            }
            let url = Url::parse(base_url).map_err(|e| ConfigError::InvalidValue {
                field: "persistence.remote.base_url",
                reason: e.to_string(),
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidValue {
                    field: "persistence.remote.base_url",
                    reason: "must be an http(s) URL".to_string(),
                }
                .into());
            }
            if self.persistence.remote.timeout_ms == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "persistence.remote.timeout_ms",
                    reason: "must be greater than 0".to_string(),
                }
                .into());
            }
        }

        self.permission_table()?;
        Ok(())
    }

    /// The permission table with configured overrides applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured fallback role is undefined.
    pub fn permission_table(&self) -> Result<PermissionTable> {
        self.access.permission_table().map_err(|e| {
            ConfigError::InvalidValue {
                field: "access.fallback_role",
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Section;
    use crate::error::Error;
    use crate::infrastructure::config::Strategy;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config.persistence.strategy, Strategy::Local);
        assert_eq!(config.persistence.local.path, "dukkan.db");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn parses_full_file() {
        let config = Config::parse_toml(
            r#"
            [logging]
            level = "debug"
            format = "json"

            [persistence]
            strategy = "mirrored"

            [persistence.local]
            path = "/var/lib/dukkan/mirror.db"

            [persistence.remote]
            base_url = "https://db.example.com/rest/v1"
            timeout_ms = 3000

            [access]
            fallback_role = "auditor"

            [access.roles]
            auditor = ["reports", "accounting"]
            "#,
        )
        .unwrap();

        assert_eq!(config.persistence.strategy, Strategy::Mirrored);
        assert_eq!(config.persistence.remote.timeout_ms, 3000);
        assert_eq!(config.persistence.remote.retry_max_attempts, 2);

        let table = config.permission_table().unwrap();
        assert_eq!(table.fallback(), "auditor");
        assert!(table.allows(Some("unknown"), Section::Reports));
        assert!(!table.allows(Some("unknown"), Section::Sales));
    }

    #[test]
    fn remote_strategy_requires_base_url() {
        let err = Config::parse_toml("[persistence]\nstrategy = \"remote\"\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingField {
                field: "persistence.remote.base_url"
            })
        ));
    }

    #[test]
    fn remote_base_url_must_be_http() {
        let err = Config::parse_toml(
            "[persistence]\nstrategy = \"remote\"\n[persistence.remote]\nbase_url = \"ftp://x\"\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("persistence.remote.base_url"));
    }

    #[test]
    fn undefined_fallback_role_is_rejected() {
        let err = Config::parse_toml("[access]\nfallback_role = \"ghost\"\n").unwrap_err();
        assert!(err.to_string().contains("access.fallback_role"));
    }

    #[test]
    fn unknown_section_is_a_parse_error() {
        let err = Config::parse_toml("[access.roles]\nclerk = [\"warehouse\"]\n").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn unknown_strategy_is_a_parse_error() {
        assert!(Config::parse_toml("[persistence]\nstrategy = \"cloud\"\n").is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.persistence.strategy, Strategy::Local);
    }

    #[test]
    fn unreadable_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ReadFile(_))));
    }
}
