use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use socialmedia_shared::errors::{AppError, AppResult, ErrorCode};
use socialmedia_shared::types::auth::UserId;

use crate::models::{
    Chat, Comment, CommentNotification, Message, MessageNotification, NewMessage, Notification,
    NotificationKind, User,
};
use crate::slug::NotificationSlug;

use super::SocialStore;

#[derive(Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    chats: BTreeMap<i32, Chat>,
    chat_members: BTreeSet<(i32, UserId)>,
    messages: BTreeMap<i32, Message>,
    comments: BTreeMap<i32, Comment>,
    message_notifications: BTreeMap<i32, MessageNotification>,
    comment_notifications: BTreeMap<i32, CommentNotification>,
    next_id: i32,
}

impl Tables {
    /// Ids come from one sequence shared by every table.
    fn allocate_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Process-local store. All tables sit behind one lock, so every operation is
/// atomic with respect to the others.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Two users sharing one chat, for running the binary without Postgres.
    pub fn with_demo_data() -> Self {
        let store = Self::new();
        let alice = store.add_user("alice");
        let bob = store.add_user("bob");
        store.add_chat(Some("general"), &[alice.id, bob.id]);
        store
    }

    // Seeding helpers for demo data and tests. Users, chats and comments are
    // created outside this service.

    pub fn add_user(&self, username: &str) -> User {
        let mut tables = self.tables.lock();
        let user = User {
            id: tables.allocate_id(),
            username: username.to_string(),
        };
        tables.users.insert(user.id, user.clone());
        user
    }

    pub fn add_chat(&self, name: Option<&str>, members: &[UserId]) -> Chat {
        let mut tables = self.tables.lock();
        let chat = Chat {
            id: tables.allocate_id(),
            name: name.map(str::to_string),
            created_at: Utc::now(),
        };
        tables.chats.insert(chat.id, chat.clone());
        for &user_id in members {
            tables.chat_members.insert((chat.id, user_id));
        }
        chat
    }

    pub fn add_comment(&self, author_id: UserId, content: &str) -> Comment {
        let mut tables = self.tables.lock();
        let comment = Comment {
            id: tables.allocate_id(),
            author_id,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        tables.comments.insert(comment.id, comment.clone());
        comment
    }

    pub fn add_comment_notification(
        &self,
        target_user: UserId,
        target_comment: i32,
        created_at: DateTime<Utc>,
    ) -> CommentNotification {
        let mut tables = self.tables.lock();
        let notif = CommentNotification {
            id: tables.allocate_id(),
            target_user,
            target_comment,
            created_at,
        };
        tables.comment_notifications.insert(notif.id, notif.clone());
        notif
    }

    pub fn add_message_notification(
        &self,
        target_user: UserId,
        target_message: i32,
        created_at: DateTime<Utc>,
    ) -> MessageNotification {
        let mut tables = self.tables.lock();
        let notif = MessageNotification {
            id: tables.allocate_id(),
            target_user,
            target_message,
            created_at,
        };
        tables.message_notifications.insert(notif.id, notif.clone());
        notif
    }

    /// Inspection helper for tests; not part of `SocialStore`.
    pub fn message_count(&self) -> usize {
        self.tables.lock().messages.len()
    }

    /// Inspection helper for tests: message notifications pointing at
    /// `message_id`, whoever they target.
    pub fn notifications_for_message(&self, message_id: i32) -> Vec<MessageNotification> {
        self.tables
            .lock()
            .message_notifications
            .values()
            .filter(|n| n.target_message == message_id)
            .cloned()
            .collect()
    }
}

impl SocialStore for MemoryStore {
    fn find_chat(&self, chat_id: i32) -> AppResult<Option<Chat>> {
        Ok(self.tables.lock().chats.get(&chat_id).cloned())
    }

    fn chat_members(&self, chat_id: i32) -> AppResult<Vec<User>> {
        let tables = self.tables.lock();
        let members = tables
            .chat_members
            .range((chat_id, UserId::MIN)..=(chat_id, UserId::MAX))
            .filter_map(|(_, user_id)| tables.users.get(user_id).cloned())
            .collect();
        Ok(members)
    }

    fn chat_messages(&self, chat_id: i32) -> AppResult<Vec<Message>> {
        let tables = self.tables.lock();
        let mut items: Vec<Message> = tables
            .messages
            .values()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect();
        items.sort_by_key(|m| (m.created_at, m.id));
        Ok(items)
    }

    fn create_message(
        &self,
        message: NewMessage,
        recipients: &[UserId],
    ) -> AppResult<(Message, Vec<MessageNotification>)> {
        let mut tables = self.tables.lock();

        if !tables.chats.contains_key(&message.chat_id) {
            return Err(AppError::new(ErrorCode::ChatNotFound, "chat not found"));
        }

        let now = Utc::now();
        let message = Message {
            id: tables.allocate_id(),
            chat_id: message.chat_id,
            author_id: message.author_id,
            content: message.content,
            created_at: now,
        };
        tables.messages.insert(message.id, message.clone());

        let mut notifications = Vec::with_capacity(recipients.len());
        for &target_user in recipients {
            let notif = MessageNotification {
                id: tables.allocate_id(),
                target_user,
                target_message: message.id,
                created_at: now,
            };
            tables.message_notifications.insert(notif.id, notif.clone());
            notifications.push(notif);
        }

        Ok((message, notifications))
    }

    fn notifications_for(&self, user_id: UserId) -> AppResult<Vec<Notification>> {
        let tables = self.tables.lock();

        let messages = tables
            .message_notifications
            .values()
            .filter(|n| n.target_user == user_id)
            .cloned()
            .map(Notification::Message);
        let comments = tables
            .comment_notifications
            .values()
            .filter(|n| n.target_user == user_id)
            .cloned()
            .map(Notification::Comment);

        Ok(messages.chain(comments).collect())
    }

    fn find_notification(&self, slug: NotificationSlug) -> AppResult<Option<Notification>> {
        let tables = self.tables.lock();
        let found = match slug.kind {
            NotificationKind::Message => tables
                .message_notifications
                .get(&slug.id)
                .cloned()
                .map(Notification::Message),
            NotificationKind::Comment => tables
                .comment_notifications
                .get(&slug.id)
                .cloned()
                .map(Notification::Comment),
        };
        Ok(found)
    }

    fn delete_notification(&self, slug: NotificationSlug) -> AppResult<bool> {
        let mut tables = self.tables.lock();
        let removed = match slug.kind {
            NotificationKind::Message => tables.message_notifications.remove(&slug.id).is_some(),
            NotificationKind::Comment => tables.comment_notifications.remove(&slug.id).is_some(),
        };
        Ok(removed)
    }

    fn clear_notifications(&self, user_id: UserId) -> AppResult<usize> {
        let mut tables = self.tables.lock();

        let before = tables.message_notifications.len() + tables.comment_notifications.len();
        tables
            .message_notifications
            .retain(|_, n| n.target_user != user_id);
        tables
            .comment_notifications
            .retain(|_, n| n.target_user != user_id);
        let after = tables.message_notifications.len() + tables.comment_notifications.len();

        Ok(before - after)
    }

    fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
