use std::path::PathBuf;

use thiserror::Error;

/// Centralized error types for the application
///
/// Store, image and delivery failures all funnel into this enum. Core operations
/// return it so callers can tell "no data" apart from "operation failed"; the bot
/// layer decides which of those the user gets to see.
///
/// # Example
///
/// ```no_run
/// use prizecore::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Database connection pool errors
    #[error("Database pool error: {0}")]
    DatabasePool(#[from] r2d2::Error),

    /// Schema migration errors
    #[error("Migration error: {0}")]
    Migration(#[from] refinery::Error),

    /// Decode/encode failures from the image crate
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image file referenced by a prize is not on disk
    #[error("Image not found: {}", .0.display())]
    MissingImage(PathBuf),

    /// Telegram API errors
    #[cfg(feature = "telegram")]
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// Blocking task was cancelled or panicked
    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// True for failures caused by a missing or unreadable image rather than the store.
    pub fn is_asset_error(&self) -> bool {
        matches!(self, AppError::MissingImage(_) | AppError::Image(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_image_message_contains_path() {
        let err = AppError::MissingImage(PathBuf::from("img/cat.png"));
        assert_eq!(err.to_string(), "Image not found: img/cat.png");
        assert!(err.is_asset_error());
    }

    #[test]
    fn store_errors_are_not_asset_errors() {
        let err = AppError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(!err.is_asset_error());
        assert!(err.to_string().starts_with("Database error"));
    }
}
