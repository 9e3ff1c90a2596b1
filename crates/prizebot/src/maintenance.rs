//! Offline commands: seeding prizes, pre-generating teasers, pool statistics.

use std::path::Path;

use prizecore::{AppResult, AssetStore, PrizeManager};

/// Outcome of a `seed` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    /// Files copied into the images directory from the source directory
    pub imported: usize,
    /// Image files in the images directory
    pub found: usize,
    /// Of those, newly registered as prizes
    pub inserted: usize,
}

/// Registers every supported image file in the images directory as a prize.
///
/// With `source`, its images are first copied into the images directory so
/// the bot can serve them from there. Re-running is safe: filenames already
/// known are skipped.
pub fn seed_from_dir(manager: &PrizeManager, assets: &AssetStore, source: Option<&Path>) -> AppResult<SeedSummary> {
    let imported = match source {
        Some(dir) => assets.import_images(dir)?,
        None => 0,
    };
    let names = assets.list_image_files()?;
    let inserted = manager.seed_prizes(&names)?;
    Ok(SeedSummary {
        imported,
        found: names.len(),
        inserted,
    })
}

/// Outcome of a `teasers` run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeaserSummary {
    pub ready: usize,
    pub failed: Vec<String>,
}

/// Makes sure every known prize has a teaser. Failures are collected, not fatal.
pub fn generate_teasers(manager: &PrizeManager, assets: &AssetStore) -> AppResult<TeaserSummary> {
    let mut summary = TeaserSummary::default();
    for prize in manager.list_prizes()? {
        match assets.ensure_teaser(&prize.image) {
            Ok(_) => summary.ready += 1,
            Err(e) => {
                log::warn!("No teaser for prize {} ({}): {}", prize.prize_id, prize.image, e);
                summary.failed.push(prize.image);
            }
        }
    }
    Ok(summary)
}
