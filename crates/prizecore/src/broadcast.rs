//! One broadcast cycle: pick a fresh prize, retire it, and send its teaser to every user.
//!
//! Delivery goes through [`TeaserSink`] so the cycle itself knows nothing about
//! Telegram. Recipients are served sequentially with a fixed pause between
//! sends; a failed recipient is logged and skipped.

use async_trait::async_trait;
use std::time::Duration;

use crate::assets::AssetStore;
use crate::core::error::AppResult;
use crate::prizes::PrizeManager;
use crate::storage::Prize;

/// Destination for broadcast teasers.
#[async_trait]
pub trait TeaserSink: Send + Sync {
    /// Sends the teaser of `prize` to `user_id` together with a way to claim it.
    async fn send_teaser(&self, user_id: i64, prize: &Prize, teaser: &[u8]) -> AppResult<()>;
}

/// What happened during one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastReport {
    pub prize: Prize,
    pub delivered: usize,
    pub failed: usize,
}

/// Runs a single broadcast cycle.
///
/// Returns `Ok(None)` when every prize has already been broadcast. The prize
/// is marked used before any message goes out, so a crash mid-cycle never
/// re-broadcasts it.
pub async fn run_broadcast_cycle<S>(
    manager: &PrizeManager,
    assets: &AssetStore,
    sink: &S,
    send_delay: Duration,
) -> AppResult<Option<BroadcastReport>>
where
    S: TeaserSink + ?Sized,
{
    let Some(prize) = manager.pick_unclaimed_prize()? else {
        log::info!("Broadcast skipped: no unused prizes left");
        return Ok(None);
    };

    manager.mark_used(prize.prize_id)?;

    let teaser = {
        let assets = assets.clone();
        let image = prize.image.clone();
        tokio::task::spawn_blocking(move || assets.read_teaser(&image)).await??
    };

    let users = manager.list_users()?;
    log::info!(
        "Broadcasting prize {} ({}) to {} user(s)",
        prize.prize_id,
        prize.image,
        users.len()
    );

    let mut delivered = 0;
    let mut failed = 0;
    for user_id in users {
        match sink.send_teaser(user_id, &prize, &teaser).await {
            Ok(()) => delivered += 1,
            Err(e) => {
                failed += 1;
                log::error!("Failed to send prize {} to user {}: {}", prize.prize_id, user_id, e);
            }
        }
        if !send_delay.is_zero() {
            tokio::time::sleep(send_delay).await;
        }
    }

    log::info!(
        "Broadcast of prize {} finished: {} delivered, {} failed",
        prize.prize_id,
        delivered,
        failed
    );

    Ok(Some(BroadcastReport {
        prize,
        delivered,
        failed,
    }))
}
