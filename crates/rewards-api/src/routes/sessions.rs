//! Session cycle routes. All require a synced user.

use axum::extract::State;
use axum::Json;

use super::{ApiJson, AppState};
use crate::domain::{
    ApiResult, CompleteSessionRequest, CompleteSessionResponse, SessionsResponse, UnlockResponse,
};
use crate::middleware::CurrentUser;

pub async fn list(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Json<SessionsResponse>> {
    let sessions = state.rewards.get_sessions(current.user_id).await?;
    Ok(Json(SessionsResponse { sessions }))
}

pub async fn unlock_next(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Json<UnlockResponse>> {
    let session = state.rewards.unlock_next_session(current.user_id).await?;
    Ok(Json(UnlockResponse {
        message: format!("Session {} unlocked", session.session_number),
        session,
    }))
}

pub async fn complete(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiJson(body): ApiJson<CompleteSessionRequest>,
) -> ApiResult<Json<CompleteSessionResponse>> {
    // 0 fails the same range check as any other bad number.
    let session_number = body.session_number.unwrap_or(0);
    let completion = state
        .rewards
        .complete_session(current.user_id, session_number)
        .await?;
    Ok(Json(CompleteSessionResponse {
        message: "Session completed successfully".to_string(),
        session: completion.completed_session,
        next_session: completion.next_session,
        sessions_reset: completion.cycle_reset,
    }))
}

pub async fn reset(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Json<SessionsResponse>> {
    let sessions = state.rewards.reset_sessions(current.user_id).await?;
    Ok(Json(SessionsResponse { sessions }))
}
