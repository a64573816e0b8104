//! Session cookie and expiry configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Longest accepted idle timeout: one year.
pub const MAX_INACTIVE_LIMIT_SECS: u64 = 365 * 24 * 60 * 60;

/// HTTP session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Name of the cookie carrying the session id
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Idle time in seconds after which the store discards a session
    #[serde(default = "default_max_inactive")]
    pub max_inactive_secs: u64,

    /// Prefix for session keys in the store
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Force the `Secure` cookie attribute on or off.
    /// When unset, cookies are secure only in production.
    pub secure_cookie: Option<bool>,
}

impl SessionConfig {
    /// Get max inactive interval as Duration
    pub fn max_inactive(&self) -> Duration {
        Duration::from_secs(self.max_inactive_secs)
    }

    /// Whether the session cookie must carry the `Secure` attribute
    pub fn secure_cookie_for(&self, environment: &Environment) -> bool {
        self.secure_cookie
            .unwrap_or(*environment == Environment::Production)
    }

    /// Validate session configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_cookie_token(&self.cookie_name) {
            return Err(ValidationError::InvalidCookieName(self.cookie_name.clone()));
        }
        if self.max_inactive_secs == 0 {
            return Err(ValidationError::InvalidMaxInactive);
        }
        if self.max_inactive_secs > MAX_INACTIVE_LIMIT_SECS {
            return Err(ValidationError::MaxInactiveTooLarge {
                max: MAX_INACTIVE_LIMIT_SECS,
            });
        }
        if self.namespace.is_empty() || self.namespace.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidNamespace);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            max_inactive_secs: default_max_inactive(),
            namespace: default_namespace(),
            secure_cookie: None,
        }
    }
}

/// RFC 6265 cookie-name: a non-empty token without separators.
fn is_cookie_token(name: &str) -> bool {
    const SEPARATORS: &str = "()<>@,;:\\\"/[]?={} \t";
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii() && !c.is_ascii_control() && !SEPARATORS.contains(c))
}

fn default_cookie_name() -> String {
    "SESSION".to_string()
}

fn default_max_inactive() -> u64 {
    1800
}

fn default_namespace() -> String {
    "session-share".to_string()
}
