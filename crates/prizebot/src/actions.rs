//! What the bot answers, decided without touching Telegram.
//!
//! Each function runs blocking store and image work and returns the reply the
//! handler should send. Handlers call them through `spawn_blocking`.

use prizecore::{build_progress, AppResult, AssetStore, ClaimOutcome, PrizeManager};

pub const WELCOME_TEXT: &str = "Hi and welcome! You are registered now.
Every 10 minutes you will get a new hidden picture and a chance to win it:
be the first to press the 'Claim!' button under it.

Use /get_my_score to see your collection.";
pub const ALREADY_REGISTERED_TEXT: &str = "You are already registered!";
pub const NOT_REGISTERED_TEXT: &str = "Please register with /start first.";
pub const NO_PRIZES_TEXT: &str = "There are no prizes to show yet.";
pub const CLAIM_GRANTED_CAPTION: &str = "Congratulations! The prize is yours!";
pub const ALREADY_CLAIMED_TEXT: &str = "This prize has already been claimed!";
pub const PRIZE_UNAVAILABLE_TEXT: &str = "This prize is unavailable.";
pub const GENERIC_ERROR_TEXT: &str = "Something went wrong. Please try again later.";

/// Name stored for a user: their Telegram username, or `user_<id>` without one.
pub fn display_name(user_id: i64, username: Option<&str>) -> String {
    match username.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => name.to_string(),
        None => format!("user_{}", user_id),
    }
}

/// `/start`: registers new users and returns the reply text.
pub fn register(manager: &PrizeManager, user_id: i64, username: Option<&str>) -> AppResult<&'static str> {
    if manager.register_user(user_id, &display_name(user_id, username))? {
        Ok(WELCOME_TEXT)
    } else {
        Ok(ALREADY_REGISTERED_TEXT)
    }
}

#[derive(Debug)]
pub enum ScoreReply {
    NotRegistered,
    Empty,
    Collage { photo: Vec<u8>, caption: String },
}

/// `/get_my_score`: the progress collage for a registered user.
pub fn score(manager: &PrizeManager, assets: &AssetStore, user_id: i64) -> AppResult<ScoreReply> {
    if !manager.is_registered(user_id)? {
        return Ok(ScoreReply::NotRegistered);
    }

    let report = build_progress(manager, assets, user_id)?;
    let caption = report.caption();
    Ok(match report.collage {
        Some(photo) => ScoreReply::Collage { photo, caption },
        None => ScoreReply::Empty,
    })
}

#[derive(Debug)]
pub enum ClaimReply {
    /// The user won: send them the original
    Prize { photo: Vec<u8>, image: String },
    /// Short notice shown as a callback answer
    Notice(&'static str),
}

/// Claim button press.
///
/// A granted claim whose original is gone from disk stays recorded; the user
/// is told the prize is unavailable.
pub fn claim(manager: &PrizeManager, assets: &AssetStore, user_id: i64, prize_id: i64) -> AppResult<ClaimReply> {
    match manager.claim_prize(user_id, prize_id)? {
        ClaimOutcome::Granted => {}
        ClaimOutcome::AlreadyClaimed => return Ok(ClaimReply::Notice(ALREADY_CLAIMED_TEXT)),
        ClaimOutcome::UnknownPrize => return Ok(ClaimReply::Notice(PRIZE_UNAVAILABLE_TEXT)),
    }

    let Some(image) = manager.prize_image(prize_id)? else {
        return Ok(ClaimReply::Notice(PRIZE_UNAVAILABLE_TEXT));
    };

    match assets.read_original(&image) {
        Ok(photo) => Ok(ClaimReply::Prize { photo, image }),
        Err(e) if e.is_asset_error() => {
            log::warn!("Prize {} won by {} but its image is missing: {}", prize_id, user_id, e);
            Ok(ClaimReply::Notice(PRIZE_UNAVAILABLE_TEXT))
        }
        Err(e) => Err(e),
    }
}

/// Callback answer after trying to send a won prize: silent on success,
/// the generic error otherwise.
pub fn delivery_notice(delivered: bool) -> Option<&'static str> {
    if delivered {
        None
    } else {
        Some(GENERIC_ERROR_TEXT)
    }
}
