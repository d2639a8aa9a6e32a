use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use socialmedia_shared::errors::{AppError, AppResult, ErrorCode};
use socialmedia_shared::types::auth::UserId;

use crate::models::{Chat, Message, NewMessage, User};
use crate::services::permissions;
use crate::store::SocialStore;

// --- Request DTOs ---

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

// --- Response DTOs ---

/// A chat as returned to its members, with the whole message thread.
#[derive(Debug, Serialize)]
pub struct ChatView {
    pub id: i32,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub members: Vec<User>,
    pub messages: Vec<Message>,
}

// --- Helpers ---

/// Load a chat and its members, failing unless `user_id` is one of them.
fn load_for_member(
    store: &dyn SocialStore,
    chat_id: i32,
    user_id: UserId,
) -> AppResult<(Chat, Vec<User>)> {
    let chat = store
        .find_chat(chat_id)?
        .ok_or_else(|| AppError::new(ErrorCode::ChatNotFound, "chat not found"))?;

    let members = store.chat_members(chat_id)?;
    permissions::ensure_member(user_id, &members)?;

    Ok((chat, members))
}

fn build_view(store: &dyn SocialStore, chat: Chat, members: Vec<User>) -> AppResult<ChatView> {
    let messages = store.chat_messages(chat.id)?;

    Ok(ChatView {
        id: chat.id,
        name: chat.name,
        created_at: chat.created_at,
        members,
        messages,
    })
}

/// Parse a send-message body. Anything but a JSON object with a string
/// `content` field is a bad request.
pub fn parse_send_request(body: &[u8]) -> AppResult<SendMessageRequest> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "rejected send-message body");
        AppError::bad_request("request body must be a JSON object with a string `content` field")
    })
}

// --- Operations ---

/// Read a chat with all of its messages.
pub fn get_chat(store: &dyn SocialStore, chat_id: i32, user_id: UserId) -> AppResult<ChatView> {
    let (chat, members) = load_for_member(store, chat_id, user_id)?;
    build_view(store, chat, members)
}

/// Post a message and notify every other member of the chat.
///
/// Existence and membership are checked before the body is looked at.
pub fn post_message(
    store: &dyn SocialStore,
    chat_id: i32,
    user_id: UserId,
    body: &[u8],
) -> AppResult<ChatView> {
    let (chat, members) = load_for_member(store, chat_id, user_id)?;
    let req = parse_send_request(body)?;

    let recipients: Vec<UserId> = members
        .iter()
        .map(|m| m.id)
        .filter(|&id| id != user_id)
        .collect();

    let (message, notifications) = store.create_message(
        NewMessage {
            chat_id,
            author_id: user_id,
            content: req.content,
        },
        &recipients,
    )?;

    tracing::info!(
        chat_id,
        author = user_id,
        message_id = message.id,
        notified = notifications.len(),
        "message posted"
    );

    build_view(store, chat, members)
}
