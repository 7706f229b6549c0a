// Route handlers and wire bodies are documented at the module level.
#![allow(missing_docs)]

//! Rewards API Gateway - REST interface over the rewards core.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   REWARDS API GATEWAY                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌──────────────────────────────────────────────┐            │
//! │  │              Middleware Stack                 │            │
//! │  │        Trace → CORS → Auth extractors         │            │
//! │  └─────────────────────┬─────────────────────────┘            │
//! │                        │                                      │
//! │  ┌─────────────────────┴─────────────────────────┐            │
//! │  │   Routes: users, sessions, withdraw, notify   │            │
//! │  └─────────────────────┬─────────────────────────┘            │
//! └────────────────────────┼──────────────────────────────────────┘
//!                          │
//!                 RewardsApi (inbound port)
//!                          │
//!                    rewards-core
//! ```
//!
//! # Route Tiers
//!
//! - **Public**: registration, invite lookup, referral, user count,
//!   notification listing, health, metrics
//! - **User**: bearer token bound to a synced local user
//! - **Admin**: bearer token with the admin role (notification management,
//!   full withdrawal history)
//!
//! # Usage
//!
//! ```ignore
//! use rewards_api::{GatewayConfig, RewardsGateway};
//!
//! let gateway = RewardsGateway::from_config(GatewayConfig::from_env()?)?;
//! gateway.serve().await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;
pub mod middleware;
pub mod routes;
pub mod service;

// Re-exports for public API
pub use domain::config::{ConfigError, GatewayConfig};
pub use domain::error::{ApiError, ApiResult, GatewayError};
pub use domain::types::*;
pub use routes::{router, AppState};
pub use service::RewardsGateway;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
