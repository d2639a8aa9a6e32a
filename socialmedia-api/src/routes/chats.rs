use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;

use socialmedia_shared::errors::{AppError, AppResult, ErrorCode};
use socialmedia_shared::types::api::{ApiResponse, Created};
use socialmedia_shared::types::auth::AuthUser;

use crate::services::chat_service::{self, ChatView};
use crate::AppState;

/// Ids that are not integers cannot name a chat.
fn parse_chat_id(raw: &str) -> AppResult<i32> {
    raw.parse()
        .map_err(|_| AppError::new(ErrorCode::ChatNotFound, "chat not found"))
}

/// GET /chats/:chat_id - the chat with all of its messages
pub async fn get_chat(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> AppResult<Json<ApiResponse<ChatView>>> {
    let chat_id = parse_chat_id(&chat_id)?;
    let view = chat_service::get_chat(state.store.as_ref(), chat_id, auth_user.id)?;

    Ok(Json(ApiResponse::ok(view)))
}

/// POST /chats/:chat_id - send a message and notify the other members
///
/// The body is taken raw so a missing or mistyped `content` surfaces as a 400
/// only after the chat and membership checks.
pub async fn post_message(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    body: Bytes,
) -> AppResult<Created<ChatView>> {
    let chat_id = parse_chat_id(&chat_id)?;
    let view = chat_service::post_message(state.store.as_ref(), chat_id, auth_user.id, &body)?;

    Ok(ApiResponse::done(view))
}
