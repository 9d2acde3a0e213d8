//! Telegram bot configuration.

use serde::Deserialize;

/// Telegram bot configuration.
///
/// The token is only ever read from `BOT_TOKEN`, never from the config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelegramConfig {
    /// Chat that receives the snapshot and may issue commands.
    #[serde(default)]
    pub chat_id: Option<i64>,
    #[serde(skip)]
    pub bot_token: Option<String>,
}

impl TelegramConfig {
    /// Token and chat id, when both are set.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, i64)> {
        match (self.bot_token.as_deref(), self.chat_id) {
            (Some(token), Some(chat_id)) => Some((token, chat_id)),
            _ => None,
        }
    }
}
