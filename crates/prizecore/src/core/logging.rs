//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - Asset directory validation and logging

use anyhow::Result;
use simplelog::*;
use std::fs::File;
use std::path::Path;

use crate::core::config;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to initialize logger
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs where prize images and teasers are read from at application startup
///
/// A missing images directory is not fatal (it is created on startup) but
/// an empty one means every broadcast cycle will find nothing to send.
pub fn log_assets_configuration() {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("🖼  Asset Configuration Check");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    log_dir_status("IMAGES_DIR", &config::IMAGES_DIR);
    log_dir_status("HIDDEN_IMAGES_DIR", &config::HIDDEN_IMAGES_DIR);
    log::info!("DATABASE_PATH: {}", config::DATABASE_PATH.as_str());
    log::info!("Broadcast interval: {}s", *config::broadcast::INTERVAL_SECS);

    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

fn log_dir_status(name: &str, dir: &str) {
    let path = Path::new(dir);
    if !path.exists() {
        log::warn!("⚠️  {}: {} (does not exist yet, will be created)", name, dir);
        return;
    }

    match std::fs::read_dir(path) {
        Ok(entries) => {
            let count = entries.filter_map(|e| e.ok()).filter(|e| e.path().is_file()).count();
            if count == 0 {
                log::warn!("⚠️  {}: {} (empty)", name, dir);
            } else {
                log::info!("✅ {}: {} ({} file(s))", name, dir, count);
            }
        }
        Err(e) => log::error!("❌ {}: {} (cannot read: {})", name, dir, e),
    }
}
