//! REST routes over the rewards core.
//!
//! | Tier | Guard |
//! |------|-------|
//! | Public | none |
//! | User | [`CurrentUser`](crate::middleware::CurrentUser) |
//! | Admin | [`AdminPrincipal`](crate::middleware::AdminPrincipal) |

use axum::extract::FromRequest;
use axum::routing::{delete, get, post, put};
use axum::Router;
use rewards_core::{IdentityProvider, NotificationId, RewardsApi};
use std::sync::Arc;

use crate::domain::ApiError;

mod health;
mod notifications;
mod sessions;
mod users;
mod withdrawals;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// Inbound port of the rewards core
    pub rewards: Arc<dyn RewardsApi>,
    /// Bearer token verification
    pub identity: Arc<dyn IdentityProvider>,
}

/// JSON body whose rejections use the gateway error format.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Parse a notification id path segment.
pub(crate) fn parse_notification_id(raw: &str) -> Result<NotificationId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_request(format!("Invalid notification id: {raw}")))
}

/// Build the route table.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Operations
        .route("/health", get(health::health))
        .route("/metrics", get(health::metrics))
        // Users
        .route("/api/users/register", post(users::register))
        .route("/api/users/invite/:code", get(users::invite_details))
        .route("/api/users/referral", post(users::referral))
        .route("/api/users/count", get(users::count))
        .route("/api/users/sync", post(users::sync))
        .route("/api/users/profile", get(users::profile))
        .route("/api/users/wallet", put(users::update_wallet))
        .route("/api/users/balance", put(users::update_balance))
        .route("/api/users/calculator", post(users::calculator))
        // Sessions
        .route("/api/users/sessions", get(sessions::list))
        .route("/api/users/sessions/unlock", post(sessions::unlock_next))
        .route("/api/users/sessions/complete", post(sessions::complete))
        .route("/api/users/sessions/reset", post(sessions::reset))
        // Withdrawals
        .route(
            "/api/withdraw",
            post(withdrawals::request).get(withdrawals::list),
        )
        // Notifications
        .route(
            "/api/notifications",
            get(notifications::list).post(notifications::add),
        )
        .route("/api/notifications/me", get(notifications::list_with_status))
        .route("/api/notifications/me/unread", get(notifications::unread_count))
        .route("/api/notifications/me/read-all", post(notifications::mark_all_read))
        .route("/api/notifications/:id", delete(notifications::remove))
        .route("/api/notifications/:id/sent", put(notifications::mark_sent))
        .route("/api/notifications/:id/read", post(notifications::mark_read))
        .with_state(state)
}
