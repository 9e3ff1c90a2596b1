//! Telegram bot integration and handlers

pub mod bot;
pub mod delivery;
pub mod handlers;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, Command};
pub use delivery::TelegramTeaserSink;
pub use handlers::{schema, HandlerDeps, HandlerError};
pub use teloxide::Bot;
