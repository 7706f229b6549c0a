//! Notification routes: public listing, admin management, per-user read
//! receipts.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::{parse_notification_id, ApiJson, AppState};
use crate::domain::{
    ApiResult, MarkedReadResponse, MessageResponse, NotificationRequest, NotificationResponse,
    NotificationViewsResponse, NotificationsResponse, UnreadCountResponse,
};
use crate::middleware::{AdminPrincipal, CurrentUser};

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<NotificationsResponse>> {
    let notifications = state.rewards.list_notifications().await?;
    Ok(Json(NotificationsResponse { notifications }))
}

pub async fn add(
    State(state): State<AppState>,
    _admin: AdminPrincipal,
    ApiJson(body): ApiJson<NotificationRequest>,
) -> ApiResult<(StatusCode, Json<NotificationResponse>)> {
    let notification = state.rewards.add_notification(body.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(NotificationResponse {
            message: "Notification added successfully".to_string(),
            notification,
        }),
    ))
}

pub async fn mark_sent(
    State(state): State<AppState>,
    _admin: AdminPrincipal,
    Path(id): Path<String>,
) -> ApiResult<Json<NotificationResponse>> {
    let id = parse_notification_id(&id)?;
    let notification = state.rewards.mark_notification_sent(id).await?;
    Ok(Json(NotificationResponse {
        message: "Notification marked as sent".to_string(),
        notification,
    }))
}

pub async fn remove(
    State(state): State<AppState>,
    _admin: AdminPrincipal,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_notification_id(&id)?;
    state.rewards.delete_notification(id).await?;
    Ok(Json(MessageResponse::new("Notification deleted successfully")))
}

pub async fn list_with_status(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Json<NotificationViewsResponse>> {
    let notifications = state
        .rewards
        .notifications_with_read_status(current.user_id)
        .await?;
    Ok(Json(NotificationViewsResponse { notifications }))
}

pub async fn unread_count(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Json<UnreadCountResponse>> {
    let unread_count = state
        .rewards
        .unread_notification_count(current.user_id)
        .await?;
    Ok(Json(UnreadCountResponse { unread_count }))
}

pub async fn mark_read(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_notification_id(&id)?;
    state
        .rewards
        .mark_notification_read(current.user_id, id)
        .await?;
    Ok(Json(MessageResponse::new("Notification marked as read")))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Json<MarkedReadResponse>> {
    let marked = state
        .rewards
        .mark_all_notifications_read(current.user_id)
        .await?;
    Ok(Json(MarkedReadResponse {
        message: "All notifications marked as read".to_string(),
        marked,
    }))
}
