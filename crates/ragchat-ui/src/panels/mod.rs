pub mod auth;
pub mod chat;
pub mod sidebar;
pub mod settings;
