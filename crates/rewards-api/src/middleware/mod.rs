//! Middleware and request guards for the API Gateway.

pub mod auth;
pub mod cors;

pub use auth::{AdminPrincipal, Authenticated, CurrentUser};
pub use cors::create_cors_layer;
