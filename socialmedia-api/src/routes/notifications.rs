use axum::extract::{Path, State};
use axum::Json;

use socialmedia_shared::errors::AppResult;
use socialmedia_shared::types::api::ApiResponse;
use socialmedia_shared::types::auth::AuthUser;

use crate::services::notification_service::{self, NotificationList};
use crate::AppState;

/// GET /notifications
/// Message and comment notifications for the authenticated user, oldest first.
pub async fn list_notifications(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<ApiResponse<NotificationList>>> {
    let list = notification_service::list_notifications(state.store.as_ref(), auth_user.id)?;

    Ok(Json(ApiResponse::ok(list)))
}

/// DELETE /notifications
/// Clear every notification of the authenticated user.
pub async fn clear_notifications(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<ApiResponse<NotificationList>>> {
    let list = notification_service::clear_notifications(state.store.as_ref(), auth_user.id)?;

    Ok(Json(ApiResponse::ok(list)))
}

/// DELETE /notifications/:slug
/// Dismiss a single notification addressed as `message-<id>` or `comment-<id>`.
pub async fn dismiss_notification(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<NotificationList>>> {
    let list =
        notification_service::dismiss_notification(state.store.as_ref(), auth_user.id, &slug)?;

    Ok(Json(ApiResponse::ok(list)))
}
