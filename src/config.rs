//! Database configuration loading.
//!
//! Credentials live under a `[database]` section of `config/config.toml`,
//! overridable through `BERTH__`-prefixed environment variables
//! (`BERTH__DATABASE__HOST` and friends). Every field has a development
//! default so a bare checkout can connect to a local database.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Database credentials consumed by the backend adapters.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DbConfig {
    #[serde(default = "default_db_name")]
    pub name: String,
    #[serde(default = "default_db_user")]
    pub user: String,
    #[serde(default = "default_db_password")]
    pub password: String,
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
}

fn default_db_name() -> String {
    "berth_dev".to_string()
}

fn default_db_user() -> String {
    "postgres".to_string()
}

fn default_db_password() -> String {
    "postgres".to_string()
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            name: default_db_name(),
            user: default_db_user(),
            password: default_db_password(),
            host: default_db_host(),
            port: default_db_port(),
        }
    }
}

impl DbConfig {
    /// Load the database configuration from `config/config.toml`, falling back to env vars.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if neither the file nor the environment yields a
    /// usable `[database]` section.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config/config.toml").required(false))
            .add_source(Environment::with_prefix("BERTH").separator("__"));

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                // If the file existed but was unreadable (parse error, permission issue, etc.), retry with env only
                if std::path::Path::new("config/config.toml").exists() {
                    log::warn!("Failed to load config file, falling back to env: {err}");
                }
                Config::builder()
                    .add_source(Environment::with_prefix("BERTH").separator("__"))
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "Failed to load configuration from file and env: {err}, then env-only error: {env_err}"
                        ))
                    })?
            }
        };

        let db_config: DbConfig = settings.get::<DbConfig>("database").map_err(|e| {
            ConfigError::Message(format!(
                "Database configuration could not be loaded from file or environment: {e}"
            ))
        })?;

        Ok(db_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_target_local_development() {
        let config = DbConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5432);
        assert_eq!(config.name, "berth_dev");
    }

    #[test]
    fn test_partial_section_fills_defaults() {
        let config: DbConfig = serde_json::from_str(r#"{"name": "orders"}"#).unwrap();
        assert_eq!(config.name, "orders");
        assert_eq!(config.user, "postgres");
        assert_eq!(config.port, 5432);
    }
}
