//! Wire identifiers for notifications: `<kind>-<id>`, e.g. `message-42`.
//!
//! Slugs are never stored; they exist so a single endpoint can address a
//! notification of either kind.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use socialmedia_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::NotificationKind;

static SLUG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z]+)-([0-9]+)$").expect("slug pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationSlug {
    pub kind: NotificationKind,
    pub id: i32,
}

impl NotificationSlug {
    pub fn new(kind: NotificationKind, id: i32) -> Self {
        Self { kind, id }
    }

    /// Parse a slug taken from a request path. A rejected slug is echoed back
    /// in the error details.
    pub fn from_path(raw: &str) -> AppResult<Self> {
        raw.parse().map_err(|err: SlugError| match err {
            SlugError::IdOutOfRange => {
                AppError::new(ErrorCode::NotificationNotFound, "notification not found")
            }
            SlugError::Malformed | SlugError::UnknownKind(_) => AppError::with_details(
                ErrorCode::InvalidNotificationSlug,
                err.to_string(),
                serde_json::json!({ "slug": raw }),
            ),
        })
    }
}

impl fmt::Display for NotificationSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlugError {
    #[error("notification slug must look like <kind>-<id>")]
    Malformed,

    #[error("unknown notification kind `{0}`")]
    UnknownKind(String),

    /// Well-formed, but the digits overflow the id type, so no row can match.
    #[error("notification id is out of range")]
    IdOutOfRange,
}

impl FromStr for NotificationSlug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = SLUG_PATTERN.captures(s).ok_or(SlugError::Malformed)?;

        let kind = caps[1]
            .parse::<NotificationKind>()
            .map_err(|_| SlugError::UnknownKind(caps[1].to_string()))?;
        let id = caps[2]
            .parse::<i32>()
            .map_err(|_| SlugError::IdOutOfRange)?;

        Ok(Self { kind, id })
    }
}
