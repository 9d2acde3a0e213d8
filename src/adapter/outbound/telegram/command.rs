//! Telegram command parsing.

/// Supported Telegram commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelegramCommand {
    Start,
    Help,
    Stats,
    Reset,
}

/// Parse error for Telegram command messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    NotACommand,
    UnknownCommand(String),
}

impl std::fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotACommand => write!(f, "message is not a command"),
            Self::UnknownCommand(cmd) => write!(f, "unknown command `{cmd}`"),
        }
    }
}

impl std::error::Error for CommandParseError {}

/// Parse a Telegram message into a bot command.
pub fn parse_command(text: &str) -> Result<TelegramCommand, CommandParseError> {
    let Some(raw_command) = text.split_whitespace().next() else {
        return Err(CommandParseError::NotACommand);
    };
    if !raw_command.starts_with('/') {
        return Err(CommandParseError::NotACommand);
    }

    let command = raw_command
        .split_once('@')
        .map_or(raw_command, |(head, _)| head);

    match command {
        "/start" => Ok(TelegramCommand::Start),
        "/help" => Ok(TelegramCommand::Help),
        "/stats" => Ok(TelegramCommand::Stats),
        "/reset" => Ok(TelegramCommand::Reset),
        other => Err(CommandParseError::UnknownCommand(other.to_string())),
    }
}

/// Help text returned by `/start` and `/help` (plain, unescaped).
#[must_use]
pub const fn command_help() -> &'static str {
    "📋 Commands\n\n\
    /stats - 📈 Current detection stats\n\
    /reset - 🔄 Clear counters and history\n\
    /help - Show all commands"
}

/// Bot commands for Telegram menu registration.
#[must_use]
pub fn bot_commands() -> Vec<(&'static str, &'static str)> {
    vec![
        ("stats", "Current detection stats"),
        ("reset", "Clear counters and history"),
        ("help", "Show all commands"),
    ]
}
