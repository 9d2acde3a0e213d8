//! Telegram command execution against the stats store.

use std::sync::Arc;

use crate::application::stats::StatsStore;

use super::command::{command_help, TelegramCommand};
use super::format::{escape_markdown, format_report};

/// Executes bot commands. Every response is `MarkdownV2`.
#[derive(Clone)]
pub struct TelegramControl {
    stats: Arc<StatsStore>,
}

impl TelegramControl {
    #[must_use]
    pub fn new(stats: Arc<StatsStore>) -> Self {
        Self { stats }
    }

    #[must_use]
    pub fn execute(&self, command: TelegramCommand) -> String {
        match command {
            TelegramCommand::Start | TelegramCommand::Help => escape_markdown(command_help()),
            TelegramCommand::Stats => format_report(&self.stats.report()),
            TelegramCommand::Reset => {
                self.stats.reset();
                "🔄 *Stats reset*\n\nCounters and history cleared\\.".to_string()
            }
        }
    }
}
