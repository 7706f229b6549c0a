//! Gateway configuration with validation.
//!
//! Loaded from `REWARDS_*` environment variables, falling back to defaults.

use rewards_core::{Principal, RewardsConfig};
use serde::{Deserialize, Serialize};
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Variable present but unparsable
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: String, value: String },

    /// Malformed entry in `REWARDS_AUTH_TOKENS`
    #[error("invalid auth token entry: {0:?}")]
    InvalidToken(String),

    /// Port 0 requested
    #[error("http port cannot be 0")]
    InvalidPort,

    /// Core settings rejected
    #[error(transparent)]
    Rewards(#[from] rewards_core::ConfigError),
}

/// Main gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP server configuration
    pub http: HttpConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Bearer tokens accepted by the static identity provider
    pub auth: AuthConfig,
    /// Rewards core tunables
    pub rewards: RewardsConfig,
}

impl GatewayConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `REWARDS_HTTP_HOST` (default: 0.0.0.0)
    /// - `REWARDS_HTTP_PORT` or `PORT` (default: 3000)
    /// - `REWARDS_CORS_ORIGINS`: comma separated, `*` for any (default: *)
    /// - `REWARDS_AUTH_TOKENS`: comma separated `token:external_id[:admin]`
    /// - Core tunables, see [`RewardsConfig::from_env`]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = match lookup("REWARDS_HTTP_HOST") {
            Some(raw) => parse_value("REWARDS_HTTP_HOST", &raw)?,
            None => defaults.http.host,
        };
        let port = match lookup("REWARDS_HTTP_PORT").or_else(|| lookup("PORT")) {
            Some(raw) => parse_value("REWARDS_HTTP_PORT", &raw)?,
            None => defaults.http.port,
        };

        let mut cors = defaults.cors;
        if let Some(raw) = lookup("REWARDS_CORS_ORIGINS") {
            cors.allowed_origins = split_list(&raw);
        }

        let auth = match lookup("REWARDS_AUTH_TOKENS") {
            Some(raw) => AuthConfig::parse(&raw)?,
            None => AuthConfig::default(),
        };

        let config = Self {
            http: HttpConfig { host, port },
            cors,
            auth,
            rewards: RewardsConfig::from_lookup(&lookup)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        self.rewards.validate()?;
        Ok(())
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 3000)
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 3000,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Enable CORS
    pub enabled: bool,
    /// Allowed origins ("*" for all)
    pub allowed_origins: Vec<String>,
    /// Allowed methods
    pub allowed_methods: Vec<String>,
    /// Allowed headers
    pub allowed_headers: Vec<String>,
    /// Max age for preflight cache
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
            allowed_methods: ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
                .map(String::from)
                .to_vec(),
            allowed_headers: vec!["Content-Type".to_string(), "Authorization".to_string()],
            max_age: 86400, // 24 hours
        }
    }
}

/// One accepted bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
    /// Bearer token
    pub token: String,
    /// Subject the token authenticates as
    pub external_id: String,
    /// Administrator role
    pub admin: bool,
}

impl TokenGrant {
    /// Principal this grant authenticates as
    pub fn principal(&self) -> Principal {
        if self.admin {
            Principal::admin(self.external_id.clone())
        } else {
            Principal::user(self.external_id.clone())
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Accepted tokens. Empty means every protected route answers 401.
    pub tokens: Vec<TokenGrant>,
}

impl AuthConfig {
    /// Parse `token:external_id[:admin]` entries separated by commas.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let mut tokens = Vec::new();
        for entry in split_list(raw) {
            let mut parts = entry.split(':');
            let grant = match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(token), Some(external_id), role, None)
                    if !token.is_empty() && !external_id.is_empty() =>
                {
                    let admin = match role {
                        None => false,
                        Some("admin") => true,
                        Some(_) => return Err(ConfigError::InvalidToken(entry.clone())),
                    };
                    TokenGrant {
                        token: token.to_string(),
                        external_id: external_id.to_string(),
                        admin,
                    }
                }
                _ => return Err(ConfigError::InvalidToken(entry.clone())),
            };
            tokens.push(grant);
        }
        Ok(Self { tokens })
    }
}

fn parse_value<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name: name.to_string(),
        value: raw.to_string(),
    })
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config_valid() {
        let config = GatewayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.http_addr().port(), 3000);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("REWARDS_HTTP_HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("REWARDS_CORS_ORIGINS", "https://a.example, https://b.example"),
            ("REWARDS_REFERRAL_BONUS", "75"),
        ]))
        .unwrap();
        assert_eq!(config.http_addr(), "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.cors.allowed_origins.len(), 2);
        assert_eq!(config.rewards.referral_bonus, 75);
    }

    #[test]
    fn test_specific_port_wins() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("REWARDS_HTTP_PORT", "9090"),
        ]))
        .unwrap();
        assert_eq!(config.http.port, 9090);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = GatewayConfig::from_lookup(lookup(&[("REWARDS_HTTP_PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = GatewayConfig::from_lookup(lookup(&[("REWARDS_HTTP_PORT", "0")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidPort);

        let err = GatewayConfig::from_lookup(lookup(&[("REWARDS_SESSION_COUNTDOWN_SECS", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Rewards(_)));
    }

    #[test]
    fn test_auth_tokens_parse() {
        let auth = AuthConfig::parse("t1:alice, t2:root:admin").unwrap();
        assert_eq!(auth.tokens.len(), 2);
        assert!(!auth.tokens[0].admin);
        assert_eq!(auth.tokens[0].principal(), Principal::user("alice"));
        assert!(auth.tokens[1].principal().is_admin);
    }

    #[test]
    fn test_auth_tokens_malformed() {
        for raw in ["lonely", "t1:alice:owner", ":alice", "t1:a:admin:x"] {
            assert!(
                matches!(AuthConfig::parse(raw), Err(ConfigError::InvalidToken(_))),
                "{raw}"
            );
        }
    }
}
