//! Authentication extractors.
//!
//! Route tiers:
//!
//! - **Public**: no extractor
//! - **User**: [`CurrentUser`], a valid bearer token bound to a local user
//! - **Admin**: [`AdminPrincipal`], a valid bearer token with the admin role
//!
//! [`Authenticated`] only checks the token. It guards identity sync, which
//! runs before the local user exists.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use rewards_core::{Principal, UserId};
use tracing::{debug, warn};

use crate::domain::ApiError;
use crate::routes::AppState;

/// Principal behind a valid bearer token.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Principal);

/// Authenticated principal and its local user.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub principal: Principal,
    pub user_id: UserId,
}

/// Authenticated principal holding the admin role.
#[derive(Debug, Clone)]
pub struct AdminPrincipal(pub Principal);

/// Token from an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            debug!(path = %parts.uri.path(), "request without bearer token");
            return Err(ApiError::unauthorized("No token provided"));
        };
        match state.identity.authenticate(token).await {
            Some(principal) => Ok(Self(principal)),
            None => {
                warn!(path = %parts.uri.path(), "invalid bearer token");
                Err(ApiError::unauthorized("Invalid token"))
            }
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Authenticated(principal) = Authenticated::from_request_parts(parts, state).await?;
        let user_id = state.rewards.resolve_principal(&principal).await?;
        Ok(Self { principal, user_id })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminPrincipal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Authenticated(principal) = Authenticated::from_request_parts(parts, state).await?;
        if !principal.is_admin {
            warn!(
                external_id = %principal.external_id,
                path = %parts.uri.path(),
                "admin route denied"
            );
            return Err(ApiError::forbidden("Admin access required"));
        }
        Ok(Self(principal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use rewards_core::{RewardsConfig, RewardsService, StaticTokenIdentity};
    use std::sync::Arc;

    fn state() -> AppState {
        let identity = StaticTokenIdentity::new()
            .with_token("user-token", Principal::user("alice"))
            .with_token("admin-token", Principal::admin("root"));
        AppState {
            rewards: Arc::new(RewardsService::in_memory(RewardsConfig::for_testing())),
            identity: Arc::new(identity),
        }
    }

    fn parts(authorization: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/users/profile");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&parts(Some("Bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&parts(Some("bearer  abc "))), Some("abc"));
        assert_eq!(bearer_token(&parts(Some("Basic abc"))), None);
        assert_eq!(bearer_token(&parts(Some("Bearer "))), None);
        assert_eq!(bearer_token(&parts(None)), None);
    }

    #[tokio::test]
    async fn test_missing_and_invalid_token() {
        let state = state();
        let err = Authenticated::from_request_parts(&mut parts(None), &state)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);

        let err = Authenticated::from_request_parts(&mut parts(Some("Bearer nope")), &state)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_current_user_requires_sync() {
        let state = state();
        let mut request = parts(Some("Bearer user-token"));
        let err = CurrentUser::from_request_parts(&mut request, &state)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let (profile, _) = state
            .rewards
            .sync_principal(&Principal::user("alice"), None)
            .await
            .unwrap();
        let user = CurrentUser::from_request_parts(&mut request, &state)
            .await
            .unwrap();
        assert_eq!(user.user_id, profile.id);
    }

    #[tokio::test]
    async fn test_admin_role_enforced() {
        let state = state();
        let err = AdminPrincipal::from_request_parts(&mut parts(Some("Bearer user-token")), &state)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);

        let AdminPrincipal(principal) =
            AdminPrincipal::from_request_parts(&mut parts(Some("Bearer admin-token")), &state)
                .await
                .unwrap();
        assert_eq!(principal.external_id, "root");
    }
}
