use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize, Serializer};

use socialmedia_shared::types::auth::UserId;

use crate::schema::{
    chats, comment_notifications, comments, message_notifications, messages, users,
};
use crate::slug::NotificationSlug;

// --- User ---

#[derive(Debug, Queryable, Selectable, Identifiable, Serialize, Clone, PartialEq, Eq)]
#[diesel(table_name = users)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

// --- Chat ---

#[derive(Debug, Queryable, Selectable, Identifiable, Serialize, Clone)]
#[diesel(table_name = chats)]
pub struct Chat {
    pub id: i32,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

// --- Message ---

#[derive(Debug, Queryable, Selectable, Identifiable, Serialize, Clone, PartialEq)]
#[diesel(table_name = messages)]
pub struct Message {
    pub id: i32,
    pub chat_id: i32,
    pub author_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = messages)]
pub struct NewMessage {
    pub chat_id: i32,
    pub author_id: UserId,
    pub content: String,
}

// --- Comment ---

#[derive(Debug, Queryable, Selectable, Identifiable, Serialize, Clone)]
#[diesel(table_name = comments)]
pub struct Comment {
    pub id: i32,
    pub author_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// --- Notifications ---

#[derive(Debug, Queryable, Selectable, Identifiable, Clone, PartialEq)]
#[diesel(table_name = message_notifications)]
pub struct MessageNotification {
    pub id: i32,
    pub target_user: UserId,
    pub target_message: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = message_notifications)]
pub struct NewMessageNotification {
    pub target_user: UserId,
    pub target_message: i32,
}

#[derive(Debug, Queryable, Selectable, Identifiable, Clone, PartialEq)]
#[diesel(table_name = comment_notifications)]
pub struct CommentNotification {
    pub id: i32,
    pub target_user: UserId,
    pub target_comment: i32,
    pub created_at: DateTime<Utc>,
}

/// The two kinds of notification a user can receive.
///
/// Variant order is significant: it breaks ties between notifications created
/// at the same instant, so comments sort before messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Comment,
    Message,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Comment => "comment",
            NotificationKind::Message => "message",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "comment" => Ok(NotificationKind::Comment),
            "message" => Ok(NotificationKind::Message),
            _ => Err(format!("unknown notification kind: {s}")),
        }
    }
}

/// A notification of either kind, as shown in a user's feed.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Message(MessageNotification),
    Comment(CommentNotification),
}

impl Notification {
    pub fn kind(&self) -> NotificationKind {
        match self {
            Notification::Message(_) => NotificationKind::Message,
            Notification::Comment(_) => NotificationKind::Comment,
        }
    }

    pub fn id(&self) -> i32 {
        match self {
            Notification::Message(n) => n.id,
            Notification::Comment(n) => n.id,
        }
    }

    pub fn target_user(&self) -> UserId {
        match self {
            Notification::Message(n) => n.target_user,
            Notification::Comment(n) => n.target_user,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Notification::Message(n) => n.created_at,
            Notification::Comment(n) => n.created_at,
        }
    }

    pub fn slug(&self) -> NotificationSlug {
        NotificationSlug::new(self.kind(), self.id())
    }

    /// Total order used by the feed: creation time, then kind, then id.
    pub fn sort_key(&self) -> (DateTime<Utc>, NotificationKind, i32) {
        (self.created_at(), self.kind(), self.id())
    }
}

impl From<MessageNotification> for Notification {
    fn from(n: MessageNotification) -> Self {
        Notification::Message(n)
    }
}

impl From<CommentNotification> for Notification {
    fn from(n: CommentNotification) -> Self {
        Notification::Comment(n)
    }
}

#[derive(Serialize)]
struct NotificationPayload {
    slug: String,
    kind: NotificationKind,
    id: i32,
    target_user: UserId,
    created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_message: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_comment: Option<i32>,
}

impl Serialize for Notification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (target_message, target_comment) = match self {
            Notification::Message(n) => (Some(n.target_message), None),
            Notification::Comment(n) => (None, Some(n.target_comment)),
        };

        NotificationPayload {
            slug: self.slug().to_string(),
            kind: self.kind(),
            id: self.id(),
            target_user: self.target_user(),
            created_at: self.created_at(),
            target_message,
            target_comment,
        }
        .serialize(serializer)
    }
}
