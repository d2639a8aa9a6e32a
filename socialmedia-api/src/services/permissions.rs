//! Authorization predicates shared by the chat and notification endpoints.

use socialmedia_shared::errors::{AppError, AppResult, ErrorCode};
use socialmedia_shared::types::auth::UserId;

use crate::models::{Notification, User};

pub fn is_member(user_id: UserId, members: &[User]) -> bool {
    members.iter().any(|m| m.id == user_id)
}

pub fn owns(user_id: UserId, notification: &Notification) -> bool {
    notification.target_user() == user_id
}

pub fn ensure_member(user_id: UserId, members: &[User]) -> AppResult<()> {
    if !is_member(user_id, members) {
        return Err(AppError::new(
            ErrorCode::NotChatMember,
            "you are not a member of this chat",
        ));
    }
    Ok(())
}

pub fn ensure_owner(user_id: UserId, notification: &Notification) -> AppResult<()> {
    if !owns(user_id, notification) {
        return Err(AppError::new(
            ErrorCode::NotNotificationOwner,
            "this notification belongs to another user",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CommentNotification;
    use chrono::Utc;

    fn user(id: UserId) -> User {
        User {
            id,
            username: format!("user{id}"),
        }
    }

    #[test]
    fn membership() {
        let members = vec![user(1), user(2)];
        assert!(is_member(1, &members));
        assert!(!is_member(3, &members));
        assert!(!is_member(1, &[]));

        let err = ensure_member(3, &members).unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::NotChatMember);
    }

    #[test]
    fn ownership() {
        let notif = Notification::Comment(CommentNotification {
            id: 1,
            target_user: 2,
            target_comment: 5,
            created_at: Utc::now(),
        });
        assert!(owns(2, &notif));
        assert!(ensure_owner(2, &notif).is_ok());

        let err = ensure_owner(1, &notif).unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::NotNotificationOwner);
    }
}
