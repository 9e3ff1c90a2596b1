//! Claim button presses

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::InputFile;

use super::types::{run_blocking, HandlerDeps, HandlerError};
use crate::actions::{self, ClaimReply, CLAIM_GRANTED_CAPTION, GENERIC_ERROR_TEXT};
use crate::telegram::delivery::parse_claim_data;

/// Handle an inline button press. Only `claim:<id>` buttons do anything; the
/// query is always answered so the client stops its spinner.
pub(super) async fn handle_claim_callback(bot: &Bot, q: CallbackQuery, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let Some(prize_id) = q.data.as_deref().and_then(parse_claim_data) else {
        log::warn!("Ignoring callback with unexpected data {:?} from {}", q.data, q.from.id);
        bot.answer_callback_query(q.id).await?;
        return Ok(());
    };

    let chat_id = ChatId::from(q.from.id);
    let user_id = chat_id.0;
    let manager = Arc::clone(&deps.manager);
    let assets = Arc::clone(&deps.assets);

    match run_blocking(move || actions::claim(&manager, &assets, user_id, prize_id)).await {
        Ok(ClaimReply::Prize { photo, image }) => {
            let sent = bot
                .send_photo(chat_id, InputFile::memory(photo).file_name(image))
                .caption(CLAIM_GRANTED_CAPTION)
                .await;
            match &sent {
                Ok(_) => log::info!("Delivered prize {} to {}", prize_id, user_id),
                Err(e) => log::error!("Prize {} won by {} but delivery failed: {}", prize_id, user_id, e),
            }
            let answer = bot.answer_callback_query(q.id);
            match actions::delivery_notice(sent.is_ok()) {
                Some(text) => answer.text(text).await?,
                None => answer.await?,
            };
        }
        Ok(ClaimReply::Notice(text)) => {
            bot.answer_callback_query(q.id).text(text).await?;
        }
        Err(e) => {
            log::error!("Claim of prize {} by {} failed: {}", prize_id, user_id, e);
            bot.answer_callback_query(q.id).text(GENERIC_ERROR_TEXT).await?;
        }
    }
    Ok(())
}
