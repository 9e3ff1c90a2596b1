//! Command handler implementations (/start, /get_my_score, /help)

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{InputFile, Message};
use teloxide::utils::command::BotCommands;

use super::types::{run_blocking, HandlerDeps, HandlerError};
use crate::actions::{self, ScoreReply, GENERIC_ERROR_TEXT, NOT_REGISTERED_TEXT, NO_PRIZES_TEXT};
use crate::telegram::bot::Command;

/// Handle /start command
pub(super) async fn handle_start_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let user_id = msg.chat.id.0;
    let username = msg.from.as_ref().and_then(|u| u.username.clone());
    let manager = Arc::clone(&deps.manager);

    let text = match run_blocking(move || actions::register(&manager, user_id, username.as_deref())).await {
        Ok(text) => text,
        Err(e) => {
            log::error!("Failed to register user {}: {}", user_id, e);
            GENERIC_ERROR_TEXT
        }
    };

    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

/// Handle /get_my_score command
pub(super) async fn handle_score_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let user_id = msg.chat.id.0;
    let manager = Arc::clone(&deps.manager);
    let assets = Arc::clone(&deps.assets);

    let reply = run_blocking(move || actions::score(&manager, &assets, user_id)).await;

    match reply {
        Ok(ScoreReply::Collage { photo, caption }) => {
            let sent = bot
                .send_photo(msg.chat.id, InputFile::memory(photo).file_name("collage.jpg"))
                .caption(caption)
                .await;
            if let Err(e) = sent {
                log::error!("Failed to send collage to {}: {}", user_id, e);
                bot.send_message(msg.chat.id, GENERIC_ERROR_TEXT).await?;
            }
        }
        Ok(ScoreReply::NotRegistered) => {
            bot.send_message(msg.chat.id, NOT_REGISTERED_TEXT).await?;
        }
        Ok(ScoreReply::Empty) => {
            bot.send_message(msg.chat.id, NO_PRIZES_TEXT).await?;
        }
        Err(e) => {
            log::error!("Failed to build progress for {}: {}", user_id, e);
            bot.send_message(msg.chat.id, GENERIC_ERROR_TEXT).await?;
        }
    }
    Ok(())
}

/// Handle /help command
pub(super) async fn handle_help_command(bot: &Bot, msg: &Message) -> Result<(), HandlerError> {
    bot.send_message(msg.chat.id, Command::descriptions().to_string()).await?;
    Ok(())
}
