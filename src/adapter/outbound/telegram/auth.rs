//! Authorization for Telegram command handling.

use teloxide::types::ChatId;
use tracing::{error, warn};

use super::command::{command_help, parse_command, CommandParseError};
use super::control::TelegramControl;
use super::format::escape_markdown;

/// Process a message and return a response if it's an authorized command.
///
/// Returns `None` for messages from other chats and for plain text.
pub fn command_response_for_message(
    text: &str,
    incoming_chat: ChatId,
    allowed_chat: ChatId,
    control: &TelegramControl,
) -> Option<String> {
    if !is_authorized_chat(incoming_chat, allowed_chat) {
        return None;
    }

    match parse_command(text) {
        Ok(command) => Some(control.execute(command)),
        Err(CommandParseError::NotACommand) => None,
        Err(err) => Some(escape_markdown(&format!(
            "Invalid command: {err}\n\n{}",
            command_help()
        ))),
    }
}

/// [`command_response_for_message`] on the blocking pool. `/reset` writes
/// the stats file.
pub async fn respond_off_runtime(
    text: String,
    incoming_chat: ChatId,
    allowed_chat: ChatId,
    control: TelegramControl,
) -> Option<String> {
    let task = tokio::task::spawn_blocking(move || {
        command_response_for_message(&text, incoming_chat, allowed_chat, &control)
    });
    match task.await {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "Telegram command task failed");
            None
        }
    }
}

fn is_authorized_chat(incoming_chat: ChatId, allowed_chat: ChatId) -> bool {
    if incoming_chat == allowed_chat {
        return true;
    }

    warn!(
        chat_id = incoming_chat.0,
        "Ignoring Telegram message from unauthorized chat"
    );
    false
}
