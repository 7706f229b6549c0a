//! User, referral, wallet and balance routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rewards_core::{InviteCode, InviteDetails};
use tracing::info;

use super::{ApiJson, AppState};
use crate::domain::{
    ApiResult, BalanceRequest, BalanceResponse, CalculatorResponse, CountResponse,
    ProfileResponse, ReferralRequest, ReferralResponse, RegisterResponse, SyncRequest,
    SyncResponse, WalletRequest, WalletResponse,
};
use crate::middleware::{Authenticated, CurrentUser};

pub async fn register(
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let code = state.rewards.register_user().await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            invite_code: code.to_string(),
        }),
    ))
}

pub async fn invite_details(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<InviteDetails>> {
    let details = state.rewards.get_invite_details(&InviteCode::new(code)).await?;
    Ok(Json(details))
}

pub async fn referral(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ReferralRequest>,
) -> ApiResult<Json<ReferralResponse>> {
    let outcome = state
        .rewards
        .process_referral(&InviteCode::new(body.referred_by.trim()))
        .await?;
    Ok(Json(ReferralResponse {
        message: "Referral processed".to_string(),
        recent_amount: outcome.recent_amount,
        invite_code: outcome.invite_code.to_string(),
    }))
}

pub async fn count(State(state): State<AppState>) -> ApiResult<Json<CountResponse>> {
    let count = state.rewards.user_count().await?;
    Ok(Json(CountResponse { count }))
}

/// Bind the caller's identity to a local user, creating it on first call.
pub async fn sync(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    body: Option<ApiJson<SyncRequest>>,
) -> ApiResult<(StatusCode, Json<SyncResponse>)> {
    let country = body.and_then(|ApiJson(req)| req.country);
    let (user, created) = state.rewards.sync_principal(&principal, country).await?;
    let (status, message) = if created {
        info!(user_id = %user.id, "new user synced");
        (StatusCode::CREATED, "User created successfully")
    } else {
        (StatusCode::OK, "User updated successfully")
    };
    Ok((
        status,
        Json(SyncResponse {
            message: message.to_string(),
            created,
            user,
        }),
    ))
}

pub async fn profile(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Json<ProfileResponse>> {
    let user = state.rewards.get_profile(current.user_id).await?;
    Ok(Json(ProfileResponse { user }))
}

pub async fn update_wallet(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiJson(body): ApiJson<WalletRequest>,
) -> ApiResult<Json<WalletResponse>> {
    let wallet_addresses = state
        .rewards
        .update_wallet_address(current.user_id, &body.wallet_type, &body.wallet_address)
        .await?;
    Ok(Json(WalletResponse {
        message: "Wallet address updated successfully".to_string(),
        wallet_addresses,
    }))
}

pub async fn update_balance(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiJson(body): ApiJson<BalanceRequest>,
) -> ApiResult<Json<BalanceResponse>> {
    let balance = state
        .rewards
        .update_balance(current.user_id, body.amount)
        .await?;
    Ok(Json(BalanceResponse { balance }))
}

pub async fn calculator(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Json<CalculatorResponse>> {
    let calculator_usage = state
        .rewards
        .increment_calculator_usage(current.user_id)
        .await?;
    Ok(Json(CalculatorResponse { calculator_usage }))
}
