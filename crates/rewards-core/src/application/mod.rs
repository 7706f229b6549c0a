//! # Application Layer
//!
//! Orchestrates the domain logic over the outbound ports.

pub mod service;
pub mod user_locks;

pub use service::RewardsService;
pub use user_locks::UserLocks;
