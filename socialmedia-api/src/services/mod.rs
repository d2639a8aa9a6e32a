pub mod chat_service;
pub mod notification_service;
pub mod permissions;
