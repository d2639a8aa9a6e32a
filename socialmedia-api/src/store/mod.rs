use socialmedia_shared::errors::AppResult;
use socialmedia_shared::types::auth::UserId;

use crate::models::{Chat, Message, MessageNotification, NewMessage, Notification, User};
use crate::slug::NotificationSlug;

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Persistence operations the chat and notification endpoints need.
///
/// Implementations must make `create_message` and `clear_notifications`
/// atomic: either every row is written/removed or none is.
pub trait SocialStore: Send + Sync {
    fn find_chat(&self, chat_id: i32) -> AppResult<Option<Chat>>;

    /// Members of a chat, ordered by user id.
    fn chat_members(&self, chat_id: i32) -> AppResult<Vec<User>>;

    /// Messages of a chat, oldest first.
    fn chat_messages(&self, chat_id: i32) -> AppResult<Vec<Message>>;

    /// Insert a message and one message notification per recipient.
    fn create_message(
        &self,
        message: NewMessage,
        recipients: &[UserId],
    ) -> AppResult<(Message, Vec<MessageNotification>)>;

    /// Every notification targeting `user_id`, of both kinds, in no particular order.
    fn notifications_for(&self, user_id: UserId) -> AppResult<Vec<Notification>>;

    fn find_notification(&self, slug: NotificationSlug) -> AppResult<Option<Notification>>;

    /// Returns whether a row was removed.
    fn delete_notification(&self, slug: NotificationSlug) -> AppResult<bool>;

    /// Remove every notification targeting `user_id`; returns the number removed.
    fn clear_notifications(&self, user_id: UserId) -> AppResult<usize>;

    /// Cheap liveness probe used by the health endpoint.
    fn ping(&self) -> AppResult<()>;
}
