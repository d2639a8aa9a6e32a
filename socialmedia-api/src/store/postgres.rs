use diesel::prelude::*;

use socialmedia_shared::clients::db::{checkout, DbPool};
use socialmedia_shared::errors::{AppError, AppResult};
use socialmedia_shared::types::auth::UserId;

use crate::models::{
    Chat, CommentNotification, Message, MessageNotification, NewMessage, NewMessageNotification,
    Notification, NotificationKind, User,
};
use crate::schema::{chat_members, chats, comment_notifications, message_notifications, messages, users};
use crate::slug::NotificationSlug;

use super::SocialStore;

/// Diesel-backed store over a pooled Postgres connection.
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl SocialStore for PgStore {
    fn find_chat(&self, chat_id: i32) -> AppResult<Option<Chat>> {
        let mut conn = checkout(&self.pool)?;

        let chat = chats::table
            .find(chat_id)
            .select(Chat::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(chat)
    }

    fn chat_members(&self, chat_id: i32) -> AppResult<Vec<User>> {
        let mut conn = checkout(&self.pool)?;

        let members = chat_members::table
            .inner_join(users::table)
            .filter(chat_members::chat_id.eq(chat_id))
            .order(users::id.asc())
            .select(User::as_select())
            .load(&mut conn)?;

        Ok(members)
    }

    fn chat_messages(&self, chat_id: i32) -> AppResult<Vec<Message>> {
        let mut conn = checkout(&self.pool)?;

        let items = messages::table
            .filter(messages::chat_id.eq(chat_id))
            .order((messages::created_at.asc(), messages::id.asc()))
            .select(Message::as_select())
            .load(&mut conn)?;

        Ok(items)
    }

    fn create_message(
        &self,
        message: NewMessage,
        recipients: &[UserId],
    ) -> AppResult<(Message, Vec<MessageNotification>)> {
        let mut conn = checkout(&self.pool)?;

        conn.transaction::<_, AppError, _>(|conn| {
            let message: Message = diesel::insert_into(messages::table)
                .values(&message)
                .returning(Message::as_returning())
                .get_result(conn)?;

            if recipients.is_empty() {
                return Ok((message, Vec::new()));
            }

            let rows: Vec<NewMessageNotification> = recipients
                .iter()
                .map(|&target_user| NewMessageNotification {
                    target_user,
                    target_message: message.id,
                })
                .collect();

            let notifications = diesel::insert_into(message_notifications::table)
                .values(&rows)
                .returning(MessageNotification::as_returning())
                .get_results(conn)?;

            Ok((message, notifications))
        })
    }

    fn notifications_for(&self, user_id: UserId) -> AppResult<Vec<Notification>> {
        let mut conn = checkout(&self.pool)?;

        let message_notifs = message_notifications::table
            .filter(message_notifications::target_user.eq(user_id))
            .select(MessageNotification::as_select())
            .load(&mut conn)?;

        let comment_notifs = comment_notifications::table
            .filter(comment_notifications::target_user.eq(user_id))
            .select(CommentNotification::as_select())
            .load(&mut conn)?;

        Ok(message_notifs
            .into_iter()
            .map(Notification::Message)
            .chain(comment_notifs.into_iter().map(Notification::Comment))
            .collect())
    }

    fn find_notification(&self, slug: NotificationSlug) -> AppResult<Option<Notification>> {
        let mut conn = checkout(&self.pool)?;

        let found = match slug.kind {
            NotificationKind::Message => message_notifications::table
                .find(slug.id)
                .select(MessageNotification::as_select())
                .first(&mut conn)
                .optional()?
                .map(Notification::Message),
            NotificationKind::Comment => comment_notifications::table
                .find(slug.id)
                .select(CommentNotification::as_select())
                .first(&mut conn)
                .optional()?
                .map(Notification::Comment),
        };

        Ok(found)
    }

    fn delete_notification(&self, slug: NotificationSlug) -> AppResult<bool> {
        let mut conn = checkout(&self.pool)?;

        let deleted = match slug.kind {
            NotificationKind::Message => {
                diesel::delete(message_notifications::table.find(slug.id)).execute(&mut conn)?
            }
            NotificationKind::Comment => {
                diesel::delete(comment_notifications::table.find(slug.id)).execute(&mut conn)?
            }
        };

        Ok(deleted > 0)
    }

    fn clear_notifications(&self, user_id: UserId) -> AppResult<usize> {
        let mut conn = checkout(&self.pool)?;

        conn.transaction::<_, AppError, _>(|conn| {
            let messages = diesel::delete(
                message_notifications::table.filter(message_notifications::target_user.eq(user_id)),
            )
            .execute(conn)?;

            let comments = diesel::delete(
                comment_notifications::table.filter(comment_notifications::target_user.eq(user_id)),
            )
            .execute(conn)?;

            Ok(messages + comments)
        })
    }

    fn ping(&self) -> AppResult<()> {
        let mut conn = checkout(&self.pool)?;
        diesel::sql_query("SELECT 1").execute(&mut conn)?;
        Ok(())
    }
}
