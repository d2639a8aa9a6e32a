use serde::Serialize;

use socialmedia_shared::errors::{AppError, AppResult, ErrorCode};
use socialmedia_shared::types::auth::UserId;

use crate::models::Notification;
use crate::services::permissions;
use crate::slug::NotificationSlug;
use crate::store::SocialStore;

/// The merged feed, oldest first.
#[derive(Debug, Serialize)]
pub struct NotificationList {
    pub notifs: Vec<Notification>,
}

/// Order by creation time; equal timestamps fall back to kind (comments
/// first) and then id, so the feed is identical across calls.
pub fn sort_notifications(mut notifs: Vec<Notification>) -> Vec<Notification> {
    notifs.sort_by_key(Notification::sort_key);
    notifs
}

/// Every notification of both kinds targeting `user_id`.
pub fn list_notifications(store: &dyn SocialStore, user_id: UserId) -> AppResult<NotificationList> {
    let notifs = sort_notifications(store.notifications_for(user_id)?);
    Ok(NotificationList { notifs })
}

/// Delete all of the user's notifications and return the (now empty) feed.
pub fn clear_notifications(store: &dyn SocialStore, user_id: UserId) -> AppResult<NotificationList> {
    let removed = store.clear_notifications(user_id)?;
    tracing::debug!(user_id, removed, "notifications cleared");

    list_notifications(store, user_id)
}

/// Delete the notification named by `raw_slug` if it belongs to `user_id`,
/// then return the refreshed feed.
pub fn dismiss_notification(
    store: &dyn SocialStore,
    user_id: UserId,
    raw_slug: &str,
) -> AppResult<NotificationList> {
    let slug = NotificationSlug::from_path(raw_slug)?;

    let notification = store
        .find_notification(slug)?
        .ok_or_else(|| AppError::new(ErrorCode::NotificationNotFound, "notification not found"))?;

    permissions::ensure_owner(user_id, &notification)?;

    if !store.delete_notification(slug)? {
        // Removed by a concurrent request between lookup and delete.
        return Err(AppError::new(ErrorCode::NotificationNotFound, "notification not found"));
    }

    tracing::debug!(user_id, slug = %slug, "notification dismissed");

    list_notifications(store, user_id)
}
