//! Application configuration
//!
//! Split into focused sub-modules by domain:
//! - `server`: HTTP server settings
//! - `database`: SQLite database settings
//! - `storage`: avatar storage root and public URL base
//! - `security`: access tokens for the session guard

mod database;
mod security;
mod server;
mod storage;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use database::DatabaseConfig;
pub use security::{AccessTokenEntry, SecurityConfig};
pub use server::ServerConfig;
pub use storage::StorageConfig;

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Application environment (development or production)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment - relaxed defaults, open CORS
    #[default]
    Development,
    /// Production environment - restricted origins, JSON logs by default
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development' or 'production'"
            )),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development or production)
    #[serde(default)]
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Avatar storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Security configuration
    #[serde(default)]
    pub security: SecurityConfig,
}

impl AppConfig {
    /// Load configuration from environment and optional file
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables (e.g., VISAGE_SERVER_PORT)
            .add_source(
                config::Environment::with_prefix("VISAGE")
                    .separator("_")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_development() {
        let config = AppConfig::default();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.path, "visage.db");
    }

    #[test]
    fn environment_parses_aliases() {
        assert_eq!("dev".parse::<Environment>(), Ok(Environment::Development));
        assert_eq!("prod".parse::<Environment>(), Ok(Environment::Production));
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn environment_display_round_trip() {
        let env: Environment = Environment::Production.to_string().parse().unwrap();
        assert_eq!(env, Environment::Production);
    }

    #[test]
    fn config_deserializes_from_toml() {
        let raw = r#"
            environment = "production"

            [server]
            host = "0.0.0.0"
            port = 8080

            [storage]
            public_base_url = "https://cdn.example.com/avatars"

            [[security.access_tokens]]
            token = "secret"
            user_id = "550e8400-e29b-41d4-a716-446655440000"
        "#;

        let config: AppConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.server.port, 8080);
        assert_eq!(
            config.storage.public_base_url,
            "https://cdn.example.com/avatars"
        );
        assert_eq!(config.security.access_tokens.len(), 1);
    }
}
