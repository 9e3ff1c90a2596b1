//! "Show my progress": a collage of owned originals and teasers for the rest.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::assets::AssetStore;
use crate::core::config::imaging::COLLAGE_JPEG_QUALITY;
use crate::core::error::AppResult;
use crate::imaging::{collage_from_paths, encode_jpeg};
use crate::prizes::PrizeManager;

/// Rendered progress for one user. Nothing here touches the filesystem
/// except reading originals and teasers.
#[derive(Debug, Clone)]
pub struct ProgressReport {
    /// Prizes the user holds
    pub won: usize,
    /// All known prizes
    pub total: usize,
    /// JPEG-encoded collage, `None` if no tile could be rendered
    pub collage: Option<Vec<u8>>,
}

impl ProgressReport {
    pub fn caption(&self) -> String {
        format!("Your achievements!\nPrizes collected: {}/{}", self.won, self.total)
    }
}

/// Builds the progress collage for `user_id`.
///
/// Every known prize becomes one tile in prize-id order: the original if the
/// user won it, otherwise its teaser (generated on demand). Tiles whose files
/// are missing or unreadable are logged and left out.
pub fn build_progress(manager: &PrizeManager, assets: &AssetStore, user_id: i64) -> AppResult<ProgressReport> {
    let prizes = manager.list_prizes()?;
    let owned: HashSet<String> = manager.list_user_wins(user_id)?.into_iter().collect();

    let mut tiles: Vec<PathBuf> = Vec::with_capacity(prizes.len());
    let mut won = 0;
    for prize in &prizes {
        let path = if owned.contains(&prize.image) {
            won += 1;
            assets.original_path(&prize.image)
        } else {
            assets.ensure_teaser(&prize.image)
        };
        match path {
            Ok(path) => tiles.push(path),
            Err(e) => log::warn!("No tile for prize {} ({}): {}", prize.prize_id, prize.image, e),
        }
    }

    let collage = match collage_from_paths(&tiles) {
        Some(canvas) => Some(encode_jpeg(&canvas, COLLAGE_JPEG_QUALITY)?),
        None => None,
    };

    Ok(ProgressReport {
        won,
        total: prizes.len(),
        collage,
    })
}
