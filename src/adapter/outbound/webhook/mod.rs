//! Per-channel alert webhooks.

mod notifier;
mod payload;

pub use notifier::{ChannelWebhooks, WebhookNotifier, ALERT_QUEUE_CAPACITY, WEBHOOK_TIMEOUT};
pub use payload::{join_url, teleport_script, EmbedStyle, WebhookPayload};
