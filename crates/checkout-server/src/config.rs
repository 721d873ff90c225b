//! Server Configuration
//!
//! Read once at startup from the environment (after an optional `.env`).

use std::fmt;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Process-level settings for the HTTP server
#[derive(Clone)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind_addr: String,

    /// Payment processor secret key; empty when unset
    pub secret_key: String,

    /// `tracing` filter used when `RUST_LOG` is absent
    pub log_filter: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_key = lookup("SECRET_KEY")
            .or_else(|| lookup("STRIPE_SECRET_KEY"))
            .unwrap_or_default();

        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            secret_key,
            log_filter: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.into()),
        }
    }

    pub fn has_secret(&self) -> bool {
        !self.secret_key.trim().is_empty()
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("secret_key", &if self.has_secret() { "<redacted>" } else { "<unset>" })
            .field("log_filter", &self.log_filter)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
        assert!(!config.has_secret());
    }

    #[test]
    fn test_secret_key_fallback() {
        let config = ServerConfig::from_lookup(|key| {
            (key == "STRIPE_SECRET_KEY").then(|| "sk_test_fallback".to_string())
        });
        assert_eq!(config.secret_key, "sk_test_fallback");

        let config = ServerConfig::from_lookup(|key| match key {
            "SECRET_KEY" => Some("sk_test_primary".into()),
            "STRIPE_SECRET_KEY" => Some("sk_test_fallback".into()),
            _ => None,
        });
        assert_eq!(config.secret_key, "sk_test_primary");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = ServerConfig::from_lookup(|key| {
            (key == "SECRET_KEY").then(|| "sk_live_abc123".to_string())
        });
        let printed = format!("{config:?}");
        assert!(!printed.contains("sk_live_abc123"));
        assert!(printed.contains("<redacted>"));
    }
}
