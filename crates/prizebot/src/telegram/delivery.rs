//! Sending broadcast teasers through Telegram.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, InputFile};

use prizecore::{AppResult, Prize, TeaserSink};

/// Prefix of the callback data carried by claim buttons
const CLAIM_PREFIX: &str = "claim:";

/// Label of the claim button under each teaser
pub const CLAIM_BUTTON_LABEL: &str = "Claim!";

pub fn claim_callback_data(prize_id: i64) -> String {
    format!("{}{}", CLAIM_PREFIX, prize_id)
}

/// Extracts the prize id from claim button data. Anything else yields `None`.
pub fn parse_claim_data(data: &str) -> Option<i64> {
    data.strip_prefix(CLAIM_PREFIX)?.parse().ok()
}

pub fn claim_keyboard(prize_id: i64) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        CLAIM_BUTTON_LABEL,
        claim_callback_data(prize_id),
    )]])
}

/// [`TeaserSink`] that sends the teaser as a photo with a claim button.
#[derive(Clone)]
pub struct TelegramTeaserSink {
    bot: Bot,
}

impl TelegramTeaserSink {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl TeaserSink for TelegramTeaserSink {
    async fn send_teaser(&self, user_id: i64, prize: &Prize, teaser: &[u8]) -> AppResult<()> {
        self.bot
            .send_photo(ChatId(user_id), InputFile::memory(teaser.to_vec()).file_name(prize.image.clone()))
            .reply_markup(claim_keyboard(prize.prize_id))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use teloxide::types::InlineKeyboardButtonKind;

    #[test]
    fn claim_data_round_trips() {
        assert_eq!(claim_callback_data(42), "claim:42");
        assert_eq!(parse_claim_data("claim:42"), Some(42));
    }

    #[test]
    fn foreign_callback_data_is_ignored() {
        assert_eq!(parse_claim_data("42"), None);
        assert_eq!(parse_claim_data("claim:"), None);
        assert_eq!(parse_claim_data("claim:abc"), None);
        assert_eq!(parse_claim_data("menu:claim:1"), None);
    }

    #[test]
    fn keyboard_has_single_claim_button() {
        let keyboard = claim_keyboard(7);
        assert_eq!(keyboard.inline_keyboard.len(), 1);
        assert_eq!(keyboard.inline_keyboard[0].len(), 1);

        let button = &keyboard.inline_keyboard[0][0];
        assert_eq!(button.text, CLAIM_BUTTON_LABEL);
        match &button.kind {
            InlineKeyboardButtonKind::CallbackData(data) => assert_eq!(data, "claim:7"),
            other => panic!("unexpected button kind: {:?}", other),
        }
    }
}
