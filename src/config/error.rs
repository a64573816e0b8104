//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid host/port combination: {0}")]
    InvalidSocketAddr(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Invalid session cookie name: {0}")]
    InvalidCookieName(String),

    #[error("Session max inactive interval must be positive")]
    InvalidMaxInactive,

    #[error("Session max inactive interval exceeds {max} seconds")]
    MaxInactiveTooLarge { max: u64 },

    #[error("Session key namespace must be non-empty and contain no whitespace")]
    InvalidNamespace,
}
