//! Application configuration
//!
//! Read from a TOML file (`<config dir>/department-manager/config.toml` by
//! default, or the path in `DEPARTMENT_MANAGER_CONFIG`). Every section and
//! field is optional and falls back to its default.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [database]
//! url = "sqlite://./department.db?mode=rwc"
//!
//! [billing]
//! car_rate = 1200000
//! motorbike_rate = 70000
//! ```

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::VehicleRates;
use crate::infrastructure::crypto::JwtConfig;
use crate::infrastructure::DatabaseConfig;
use crate::shared::errors::ConfigError;

pub const CONFIG_PATH_ENV: &str = "DEPARTMENT_MANAGER_CONFIG";

const APP_DIR: &str = "department-manager";

/// `<config dir>/department-manager/config.toml`, falling back to the
/// working directory when the platform has no config dir.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}

/// Path from `DEPARTMENT_MANAGER_CONFIG`, else [`default_config_path`].
pub fn config_path_from_env() -> PathBuf {
    std::env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_config_path())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub admin: AdminConfig,
    pub logging: LoggingConfig,
    pub billing: BillingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds allowed for cleanup after the shutdown signal
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    /// When false every API route is reachable without a token.
    pub require_auth: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_hours: 24,
            require_auth: true,
        }
    }
}

/// Account created at startup when the user table is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            name: "Administrator".to_string(),
            email: "admin@department.local".to_string(),
            password: "admin123".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`
    pub level: String,
    /// "text" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Monthly parking rates per vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    pub car_rate: Decimal,
    pub motorbike_rate: Decimal,
}

impl Default for BillingConfig {
    fn default() -> Self {
        let rates = VehicleRates::default();
        Self {
            car_rate: rates.car,
            motorbike_rate: rates.motorbike,
        }
    }
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults; environment
    /// overrides are applied either way.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })?;
            Self::parse(&raw, path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn parse(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// `DATABASE_URL` and `JWT_SECRET` win over the file.
    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            self.database.url = url;
        }
        if let Some(secret) = lookup("JWT_SECRET").filter(|v| !v.trim().is_empty()) {
            self.security.jwt_secret = secret;
        }
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig::new(
            self.security.jwt_secret.clone(),
            self.security.jwt_expiration_hours,
        )
    }

    pub fn vehicle_rates(&self) -> VehicleRates {
        VehicleRates {
            car: self.billing.car_rate,
            motorbike: self.billing.motorbike_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::parse("", &dir.path().join("config.toml")).unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(config.security.require_auth);
        assert_eq!(config.vehicle_rates(), VehicleRates::default());

        let loaded = AppConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded.server.host, "0.0.0.0");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nport = 9090\n\n[billing]\ncar_rate = 1000000\n\n[logging]\nformat = \"json\""
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.shutdown_timeout, 30);
        assert_eq!(config.billing.car_rate, Decimal::from(1_000_000));
        assert_eq!(config.billing.motorbike_rate, Decimal::from(70_000));
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();

        let err = AppConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| match key {
            "DATABASE_URL" => Some("sqlite::memory:".to_string()),
            "JWT_SECRET" => Some(" ".to_string()),
            _ => None,
        });
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.security.jwt_secret, "change-me-in-production");
    }

    #[test]
    fn default_path_ends_with_app_dir() {
        let path = default_config_path();
        assert!(path.ends_with("department-manager/config.toml"));
    }
}
