//! Bot initialization and command definitions

use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::types::BotCommand;
use teloxide::utils::command::BotCommands;

use prizecore::config;

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "snake_case", description = "Available commands:")]
pub enum Command {
    #[command(description = "register and start receiving prizes")]
    Start,
    #[command(description = "show your prize collection")]
    GetMyScore,
    #[command(description = "show this help")]
    Help,
}

/// Creates a Bot instance with custom or default API URL
///
/// The token comes from BOT_TOKEN (or TELOXIDE_TOKEN).
pub fn create_bot() -> anyhow::Result<Bot> {
    if config::BOT_TOKEN.is_empty() {
        return Err(anyhow::anyhow!("BOT_TOKEN environment variable not set"));
    }

    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;
    let bot = Bot::with_client(config::BOT_TOKEN.as_str(), client);

    let bot = match config::BOT_API_URL.as_deref() {
        Some(bot_api_url) => {
            log::info!("Using custom Bot API URL: {}", bot_api_url);
            let url = url::Url::parse(bot_api_url).map_err(|e| anyhow::anyhow!("Invalid BOT_API_URL: {}", e))?;
            bot.set_api_url(url)
        }
        None => bot,
    };

    Ok(bot)
}

/// Command list shown in the Telegram UI
pub fn bot_commands() -> Vec<BotCommand> {
    vec![
        BotCommand::new("start", "register and start receiving prizes"),
        BotCommand::new("get_my_score", "show your prize collection"),
        BotCommand::new("help", "show this help"),
    ]
}

/// Sets up bot commands in Telegram UI
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(bot_commands()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn score_command_uses_snake_case() {
        let cmd = Command::parse("/get_my_score", "prizebot").unwrap();
        assert_eq!(cmd, Command::GetMyScore);
        assert_eq!(Command::parse("/start", "prizebot").unwrap(), Command::Start);
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert!(Command::parse("/getmyscore", "prizebot").is_err());
    }

    #[test]
    fn descriptions_list_every_command() {
        let text = Command::descriptions().to_string();
        assert!(text.contains("Available commands"));
        for name in ["/start", "/get_my_score", "/help"] {
            assert!(text.contains(name), "{name} missing from help");
        }
    }

    #[test]
    fn ui_commands_parse_back_into_enum() {
        let parsed: Vec<Command> = bot_commands()
            .into_iter()
            .map(|c| Command::parse(&format!("/{}", c.command), "prizebot").unwrap())
            .collect();
        assert_eq!(parsed, vec![Command::Start, Command::GetMyScore, Command::Help]);
    }
}
