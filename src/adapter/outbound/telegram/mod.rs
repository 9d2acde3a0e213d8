//! Telegram bot: stats snapshot sink and command handling.
//!
//! Requires the `telegram` feature to be enabled.

mod auth;
mod command;
mod control;
mod format;
mod sink;

use teloxide::prelude::*;
use teloxide::types::{BotCommand, ParseMode};
use tracing::{error, info, warn};

pub use control::TelegramControl;
pub use sink::TelegramSink;

use auth::respond_off_runtime;
use command::bot_commands;

/// Listen for bot commands from the stats chat until the process exits.
pub async fn run_command_listener(bot: Bot, chat_id: i64, control: TelegramControl) {
    let allowed_chat = ChatId(chat_id);

    if let Err(e) = register_bot_commands(&bot).await {
        warn!(error = %e, "Failed to register bot commands with Telegram");
    }

    info!(chat_id, "Telegram command listener started");

    teloxide::repl(bot, move |bot: Bot, msg: Message| {
        let control = control.clone();
        async move {
            let Some(text) = msg.text() else {
                return respond(());
            };

            if let Some(response) =
                respond_off_runtime(text.to_string(), msg.chat.id, allowed_chat, control).await
            {
                if let Err(e) = bot
                    .send_message(msg.chat.id, response)
                    .parse_mode(ParseMode::MarkdownV2)
                    .await
                {
                    error!(error = %e, "Failed to send Telegram command response");
                }
            }

            respond(())
        }
    })
    .await;
}

async fn register_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    let commands: Vec<BotCommand> = bot_commands()
        .into_iter()
        .map(|(cmd, desc)| BotCommand::new(cmd, desc))
        .collect();

    bot.set_my_commands(commands).await?;
    info!("Registered bot commands with Telegram");
    Ok(())
}
