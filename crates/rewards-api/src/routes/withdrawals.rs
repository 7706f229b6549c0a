//! Withdrawal routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use rewards_core::WithdrawalScope;

use super::{ApiJson, AppState};
use crate::domain::{ApiResult, WithdrawRequest, WithdrawResponse, WithdrawalsResponse};
use crate::middleware::CurrentUser;

pub async fn request(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiJson(body): ApiJson<WithdrawRequest>,
) -> ApiResult<(StatusCode, Json<WithdrawResponse>)> {
    let withdrawal = state
        .rewards
        .request_withdrawal(current.user_id, body.amount, &body.wallet_address)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(WithdrawResponse {
            message: "Withdrawal requested".to_string(),
            withdrawal,
        }),
    ))
}

/// Caller's history, or every user's for admins.
pub async fn list(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Json<WithdrawalsResponse>> {
    let scope = if current.principal.is_admin {
        WithdrawalScope::All
    } else {
        WithdrawalScope::Own(current.user_id)
    };
    let withdrawals = state.rewards.list_withdrawals(scope).await?;
    Ok(Json(WithdrawalsResponse { withdrawals }))
}
