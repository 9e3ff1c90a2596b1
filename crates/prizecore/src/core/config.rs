use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Custom Bot API server (local telegram-bot-api), if any
/// Read from BOT_API_URL environment variable
pub static BOT_API_URL: Lazy<Option<String>> = Lazy::new(|| {
    env::var("BOT_API_URL")
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
});

/// Database file path
/// Read from DATABASE_PATH environment variable
/// Default: database.sqlite
pub static DATABASE_PATH: Lazy<String> =
    Lazy::new(|| env::var("DATABASE_PATH").unwrap_or_else(|_| "database.sqlite".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: app.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "app.log".to_string()));

/// Directory with the original prize images
/// Read from IMAGES_DIR environment variable, supports tilde (~) expansion
/// Default: img
pub static IMAGES_DIR: Lazy<String> = Lazy::new(|| expand_dir("IMAGES_DIR", "img"));

/// Directory with the blurred teaser variants (same filenames as IMAGES_DIR)
/// Read from HIDDEN_IMAGES_DIR environment variable
/// Default: hidden_img
pub static HIDDEN_IMAGES_DIR: Lazy<String> = Lazy::new(|| expand_dir("HIDDEN_IMAGES_DIR", "hidden_img"));

fn expand_dir(var: &str, default: &str) -> String {
    let raw = env::var(var).unwrap_or_else(|_| default.to_string());
    shellexpand::tilde(&raw).into_owned()
}

/// Broadcast cycle configuration
pub mod broadcast {
    use super::{env, Duration, Lazy};

    /// Default interval between prize broadcasts (in seconds)
    pub const DEFAULT_INTERVAL_SECS: u64 = 600; // 10 minutes

    /// Interval between prize broadcasts
    /// Read from BROADCAST_INTERVAL_SECS environment variable
    pub static INTERVAL_SECS: Lazy<u64> = Lazy::new(|| {
        env::var("BROADCAST_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(DEFAULT_INTERVAL_SECS)
    });

    /// Pause between two recipients of the same broadcast (milliseconds)
    /// Keeps us under Telegram's per-bot flood limits
    pub const SEND_DELAY_MS: u64 = 100;

    /// Broadcast interval duration
    pub fn interval() -> Duration {
        Duration::from_secs(*INTERVAL_SECS)
    }

    /// Inter-send delay duration
    pub fn send_delay() -> Duration {
        Duration::from_millis(SEND_DELAY_MS)
    }
}

/// Image processing configuration
pub mod imaging {
    /// Edge length of a collage tile (pixels)
    pub const TILE_SIZE: u32 = 200;

    /// Gaussian sigma used for teasers.
    /// Sigma of a 51x51 Gaussian kernel: 0.3 * ((51 - 1) / 2 - 1) + 0.8
    pub const BLUR_SIGMA: f32 = 8.0;

    /// JPEG quality for collages sent to Telegram
    pub const COLLAGE_JPEG_QUALITY: u8 = 85;

    /// File extensions picked up when seeding prizes from the images directory
    pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
}

/// Retry configuration
pub mod retry {
    use super::Duration;

    /// Maximum number of retries for dispatcher reconnection
    pub const MAX_DISPATCHER_RETRIES: u32 = 5;

    /// Delay between dispatcher retry attempts (in seconds)
    pub const DISPATCHER_RETRY_DELAY_SECS: u64 = 5;

    /// Base for exponential backoff on dispatcher panics (seconds, raised to attempt number)
    pub const EXPONENTIAL_BACKOFF_BASE: u64 = 2;

    /// Attempts to reach the Bot API on startup before giving up
    pub const STARTUP_MAX_RETRIES: u32 = 60;

    /// Dispatcher retry delay duration
    pub fn dispatcher_delay() -> Duration {
        Duration::from_secs(DISPATCHER_RETRY_DELAY_SECS)
    }
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API calls (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blur_sigma_matches_kernel_51() {
        let derived = 0.3 * ((51.0 - 1.0) * 0.5 - 1.0) + 0.8;
        assert!((imaging::BLUR_SIGMA - derived as f32).abs() < 1e-4);
    }

    #[test]
    fn default_durations() {
        assert_eq!(broadcast::send_delay(), Duration::from_millis(100));
        assert_eq!(retry::dispatcher_delay(), Duration::from_secs(5));
        assert!(broadcast::interval() > Duration::ZERO);
    }
}
