//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `SESSION_SHARE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use session_share::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server listening on port {}", config.server.port);
//! ```

mod error;
mod redis;
mod server;
mod session;

pub use error::{ConfigError, ValidationError};
pub use self::redis::RedisConfig;
pub use server::{Environment, ServerConfig};
pub use session::SessionConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Redis configuration (shared session store)
    pub redis: RedisConfig,

    /// Session cookie and expiry settings
    #[serde(default)]
    pub session: SessionConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SESSION_SHARE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `SESSION_SHARE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `SESSION_SHARE__REDIS__URL=...` -> `redis.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SESSION_SHARE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.redis.validate()?;
        self.session.validate()?;
        Ok(())
    }

    /// Whether the session cookie carries the `Secure` attribute
    pub fn secure_cookie(&self) -> bool {
        self.session.secure_cookie_for(&self.server.environment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "SESSION_SHARE__REDIS__URL",
        "SESSION_SHARE__SERVER__PORT",
        "SESSION_SHARE__SERVER__ENVIRONMENT",
        "SESSION_SHARE__SESSION__COOKIE_NAME",
        "SESSION_SHARE__SESSION__MAX_INACTIVE_SECS",
        "SESSION_SHARE__SESSION__SECURE_COOKIE",
    ];

    fn set_minimal_env() {
        env::set_var("SESSION_SHARE__REDIS__URL", "redis://localhost:6379");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.redis.url, "redis://localhost:6379");
    }

    #[test]
    fn test_missing_redis_url_fails() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_err());
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.session.cookie_name, "SESSION");
        assert_eq!(config.session.max_inactive_secs, 1800);
        assert!(!config.secure_cookie());
    }

    #[test]
    fn test_production_environment_secures_cookie() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("SESSION_SHARE__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.server.is_production());
        assert!(config.secure_cookie());
    }

    #[test]
    fn test_custom_port_and_session_settings() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("SESSION_SHARE__SERVER__PORT", "8081");
        env::set_var("SESSION_SHARE__SESSION__COOKIE_NAME", "SID");
        env::set_var("SESSION_SHARE__SESSION__MAX_INACTIVE_SECS", "60");
        env::set_var("SESSION_SHARE__SESSION__SECURE_COOKIE", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.session.cookie_name, "SID");
        assert_eq!(config.session.max_inactive_secs, 60);
        assert!(config.secure_cookie());
    }

    #[test]
    fn test_oversized_max_inactive_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("SESSION_SHARE__SESSION__MAX_INACTIVE_SECS", "10000000000000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MaxInactiveTooLarge { .. })
        ));
    }
}
