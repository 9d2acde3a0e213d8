//! Telegram chat as the stats snapshot sink.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{MessageId, ParseMode};
use teloxide::{ApiError, RequestError};
use tracing::debug;

use super::format::format_report;
use crate::domain::{MessageHandle, StatsReport};
use crate::port::outbound::snapshot::{SinkError, SnapshotSink};

pub struct TelegramSink {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramSink {
    #[must_use]
    pub fn new(bot: Bot, chat_id: i64) -> Self {
        Self {
            bot,
            chat_id: ChatId(chat_id),
        }
    }
}

/// Classify a failed edit. An unchanged message counts as success.
fn edit_result(err: RequestError) -> Result<(), SinkError> {
    match err {
        RequestError::Api(ApiError::MessageNotModified) => Ok(()),
        RequestError::Api(
            ApiError::MessageToEditNotFound
            | ApiError::MessageIdInvalid
            | ApiError::MessageCantBeEdited,
        ) => Err(SinkError::MessageGone),
        other => Err(SinkError::Transport(other.to_string())),
    }
}

#[async_trait]
impl SnapshotSink for TelegramSink {
    async fn connect(&self) -> Result<(), SinkError> {
        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;
        debug!(bot = %me.username(), "Telegram bot authenticated");
        Ok(())
    }

    async fn publish(&self, report: &StatsReport) -> Result<MessageHandle, SinkError> {
        let message = self
            .bot
            .send_message(self.chat_id, format_report(report))
            .parse_mode(ParseMode::MarkdownV2)
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;
        Ok(MessageHandle(i64::from(message.id.0)))
    }

    async fn edit(&self, handle: MessageHandle, report: &StatsReport) -> Result<(), SinkError> {
        // Handles restored from another sink may not fit a Telegram id.
        let Ok(id) = i32::try_from(handle.0) else {
            return Err(SinkError::MessageGone);
        };

        match self
            .bot
            .edit_message_text(self.chat_id, MessageId(id), format_report(report))
            .parse_mode(ParseMode::MarkdownV2)
            .await
        {
            Ok(_) => Ok(()),
            Err(e) => edit_result(e),
        }
    }
}
