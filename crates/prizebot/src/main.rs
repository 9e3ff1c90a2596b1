use anyhow::Result;
use dotenvy::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::RequestError;
use tokio::time::sleep;

use prizebot::cli::{Cli, Commands};
use prizebot::maintenance::{generate_teasers, seed_from_dir};
use prizebot::scheduler::start_broadcast_scheduler;
use prizebot::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps, TelegramTeaserSink};
use prizecore::core::{init_logger, log_assets_configuration};
use prizecore::{config, create_pool, AssetStore, PrizeManager};

/// Main entry point for the prize bot
///
/// Parses CLI arguments and dispatches to appropriate subcommand.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Log panics from dispatcher and background tasks instead of dying silently
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
        if let Some(msg) = panic_info.payload().downcast_ref::<&str>() {
            log::error!("Panic message: {}", msg);
        }
    }));

    // Load environment variables from .env before any config is read
    let _ = dotenv();

    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::Run) => run_bot().await,
        Some(Commands::Seed { dir }) => run_seed(dir),
        Some(Commands::Teasers) => run_teasers(),
        Some(Commands::Stats { json }) => run_stats(json),
        None => {
            log::info!("No command specified, running bot in default mode");
            run_bot().await
        }
    }
}

fn open_manager() -> Result<PrizeManager> {
    let pool = create_pool(&config::DATABASE_PATH)
        .map_err(|e| anyhow::anyhow!("Failed to create database pool: {}", e))?;
    Ok(PrizeManager::new(Arc::new(pool)))
}

/// Register images from IMAGES_DIR as prizes, importing `dir` into it first
fn run_seed(dir: Option<String>) -> Result<()> {
    let manager = open_manager()?;
    let assets = AssetStore::from_config();
    assets.ensure_dirs()?;

    let source = dir.map(PathBuf::from);
    let summary = seed_from_dir(&manager, &assets, source.as_deref())?;
    if let Some(source) = &source {
        println!("Imported {} image(s) from {}", summary.imported, source.display());
    }
    println!(
        "Seeded {} new prize(s) from {} image(s) in {}",
        summary.inserted,
        summary.found,
        assets.images_dir().display()
    );
    Ok(())
}

/// Pre-generate teasers for every known prize
fn run_teasers() -> Result<()> {
    let manager = open_manager()?;
    let assets = AssetStore::from_config();
    assets.ensure_dirs()?;

    let summary = generate_teasers(&manager, &assets)?;
    println!("Teasers ready: {}", summary.ready);
    if !summary.failed.is_empty() {
        println!("Failed: {}", summary.failed.join(", "));
    }
    Ok(())
}

/// Print prize pool statistics
fn run_stats(json: bool) -> Result<()> {
    let stats = open_manager()?.stats()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("Users:    {}", stats.users);
        println!("Prizes:   {}", stats.prizes);
        println!("Used:     {}", stats.used);
        println!("Claimed:  {}", stats.claimed);
        println!("Unused:   {}", stats.prizes.saturating_sub(stats.used));
    }
    Ok(())
}

fn is_retryable_startup_error(e: &RequestError) -> bool {
    matches!(
        e,
        RequestError::Network(_) | RequestError::RetryAfter(_) | RequestError::Io(_)
    ) || e.to_string().contains("restart")
}

async fn run_bot() -> Result<()> {
    let bot_init_start = std::time::Instant::now();
    log::info!("Starting bot...");

    log_assets_configuration();

    let bot = create_bot()?;

    // Retry while the Bot API is unreachable or still starting up
    let bot_info = {
        let startup_max_retries = config::retry::STARTUP_MAX_RETRIES;
        let mut startup_retry = 0;
        loop {
            match bot.get_me().await {
                Ok(info) => break info,
                Err(e) => {
                    startup_retry += 1;
                    if startup_retry >= startup_max_retries || !is_retryable_startup_error(&e) {
                        return Err(anyhow::anyhow!(
                            "Failed to connect to Bot API after {} attempt(s): {}",
                            startup_retry,
                            e
                        ));
                    }

                    log::warn!(
                        "Bot API not ready (attempt {}/{}): {}. Retrying in 5 seconds...",
                        startup_retry,
                        startup_max_retries,
                        e
                    );
                    sleep(Duration::from_secs(5)).await;
                }
            }
        }
    };
    log::info!("Bot username: {:?}, Bot ID: {}", bot_info.username.as_deref(), bot_info.id);

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to set bot commands: {}", e);
    }

    let manager = Arc::new(open_manager()?);
    let assets = Arc::new(AssetStore::from_config());
    assets.ensure_dirs()?;

    let stats = manager.stats()?;
    if stats.prizes == 0 {
        log::warn!("No prizes in the database; run `prizebot seed` to register images");
    } else {
        log::info!(
            "Prize pool: {} total, {} already broadcast, {} claimed, {} user(s)",
            stats.prizes,
            stats.used,
            stats.claimed,
            stats.users
        );
    }

    let _scheduler = start_broadcast_scheduler(
        Arc::clone(&manager),
        Arc::clone(&assets),
        Arc::new(TelegramTeaserSink::new(bot.clone())),
        config::broadcast::interval(),
    );

    let handler = schema(HandlerDeps::new(Arc::clone(&manager), Arc::clone(&assets)));

    log::info!("Bot initialization complete in {:.2}s", bot_init_start.elapsed().as_secs_f64());

    let mut retry_count = 0;
    let max_retries = config::retry::MAX_DISPATCHER_RETRIES;

    // Run the dispatcher with retry logic
    loop {
        let bot_clone = bot.clone();
        let handler_clone = handler.clone();

        // Separate task so a listener panic surfaces through the JoinHandle
        let handle = tokio::spawn(async move {
            use teloxide::update_listeners::Polling;

            let listener = Polling::builder(bot_clone.clone()).drop_pending_updates().build();

            Dispatcher::builder(bot_clone, handler_clone)
                .dependencies(DependencyMap::new())
                .enable_ctrlc_handler()
                .build()
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the update listener"),
                )
                .await
        });

        match handle.await {
            Ok(()) => {
                log::info!("Dispatcher shutdown gracefully");
                break;
            }
            Err(join_err) if join_err.is_panic() => {
                log::error!("Dispatcher panicked: {}", join_err);

                if retry_count < max_retries {
                    retry_count += 1;
                    log::info!(
                        "Retrying dispatcher connection after panic (attempt {}/{})...",
                        retry_count,
                        max_retries
                    );
                    exponential_backoff(retry_count).await;
                } else {
                    log::error!("Max retries reached after panic. Exiting...");
                    break;
                }
            }
            Err(join_err) => {
                log::warn!("Dispatcher task was cancelled: {}", join_err);
                break;
            }
        }

        sleep(config::retry::dispatcher_delay()).await;
    }

    Ok(())
}

async fn exponential_backoff(retry_count: u32) {
    let delay = Duration::from_secs(config::retry::EXPONENTIAL_BACKOFF_BASE.pow(retry_count));
    sleep(delay).await;
}
