//! Background task that runs one broadcast cycle per interval.
//!
//! The first cycle fires one full interval after startup.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use prizecore::{config, run_broadcast_cycle, AssetStore, PrizeManager, TeaserSink};

/// Start the broadcast scheduler background task.
pub fn start_broadcast_scheduler<S>(
    manager: Arc<PrizeManager>,
    assets: Arc<AssetStore>,
    sink: Arc<S>,
    period: Duration,
) -> JoinHandle<()>
where
    S: TeaserSink + 'static,
{
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        log::info!("Broadcast scheduler started (interval: {}s)", period.as_secs());

        loop {
            ticker.tick().await;

            match run_broadcast_cycle(&manager, &assets, sink.as_ref(), config::broadcast::send_delay()).await {
                Ok(Some(report)) => log::debug!("Broadcast cycle done: {:?}", report),
                Ok(None) => {}
                Err(e) => log::error!("Broadcast cycle failed: {}", e),
            }
        }
    })
}
