//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the
//! `config` and `dotenvy` crates. Variables use the `NUTRI_CONNECT` prefix and
//! `__` between nested keys.
//!
//! # Example
//!
//! ```no_run
//! use nutri_connect::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod auth;
mod database;
mod error;
mod server;

pub use ai::AiConfig;
pub use auth::{AuthConfig, MIN_SECRET_BYTES};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL settings; profiles stay in memory when absent
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Bearer token validation
    pub auth: AuthConfig,

    /// Gemini text generation
    pub ai: AiConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads `NUTRI_CONNECT__<SECTION>__<KEY>`
    /// variables:
    ///
    /// - `NUTRI_CONNECT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `NUTRI_CONNECT__AI__GEMINI_API_KEY=...` -> `ai.gemini_api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or a value
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("NUTRI_CONNECT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        self.auth.validate(&self.server.environment)?;
        self.ai.validate(&self.server.environment)?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "NUTRI_CONNECT__AUTH__JWT_SECRET",
        "NUTRI_CONNECT__AUTH__ISSUER",
        "NUTRI_CONNECT__AI__GEMINI_API_KEY",
        "NUTRI_CONNECT__AI__TEMPERATURE",
        "NUTRI_CONNECT__DATABASE__URL",
        "NUTRI_CONNECT__SERVER__PORT",
        "NUTRI_CONNECT__SERVER__ENVIRONMENT",
    ];

    fn set_minimal_env() {
        env::set_var("NUTRI_CONNECT__AUTH__JWT_SECRET", "dev-secret");
        env::set_var("NUTRI_CONNECT__AI__GEMINI_API_KEY", "test-gemini-key");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        set_minimal_env();
        for (key, value) in extra {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_load_minimal_environment() {
        let config = load_with(&[]).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert!(config.database.is_none());
        assert_eq!(config.ai.gemini_api_key.expose_secret(), "test-gemini-key");
        assert_eq!(config.ai.max_retries, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_database_section_is_optional() {
        let config = load_with(&[(
            "NUTRI_CONNECT__DATABASE__URL",
            "postgres://localhost/nutri_connect",
        )])
        .unwrap();

        let database = config.database.expect("database section");
        assert_eq!(database.url, "postgres://localhost/nutri_connect");
        assert_eq!(database.max_connections, 10);
    }

    #[test]
    fn test_custom_values() {
        let config = load_with(&[
            ("NUTRI_CONNECT__SERVER__PORT", "3000"),
            ("NUTRI_CONNECT__AUTH__ISSUER", "nutri-auth"),
            ("NUTRI_CONNECT__AI__TEMPERATURE", "0.7"),
        ])
        .unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.auth.issuer.as_deref(), Some("nutri-auth"));
        assert_eq!(config.ai.temperature, Some(0.7));
    }

    #[test]
    fn test_production_rejects_short_secret() {
        let config = load_with(&[("NUTRI_CONNECT__SERVER__ENVIRONMENT", "production")]).unwrap();

        assert!(config.is_production());
        assert!(matches!(
            config.validate(),
            Err(ValidationError::JwtSecretTooShort(_))
        ));
    }

    #[test]
    fn test_missing_api_key_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var("NUTRI_CONNECT__AUTH__JWT_SECRET", "dev-secret");
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
