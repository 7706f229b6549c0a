//! Domain types for the API Gateway.
//!
//! Configuration, error mapping and wire bodies.

pub mod config;
pub mod error;
pub mod types;

// Re-exports for convenience
pub use config::{AuthConfig, ConfigError, CorsConfig, GatewayConfig, HttpConfig, TokenGrant};
pub use error::{ApiError, ApiResult, GatewayError};
pub use types::*;
