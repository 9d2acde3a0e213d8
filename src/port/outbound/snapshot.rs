//! Snapshot sink port: where the rendered stats report is published.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{MessageHandle, StatsReport};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// The previously published message is gone and cannot be edited.
    #[error("message no longer exists")]
    MessageGone,

    #[error("sink unavailable: {0}")]
    Transport(String),
}

/// External sink for the stats report.
///
/// The sink renders the report itself, so each backend can use its own
/// markup.
#[async_trait]
pub trait SnapshotSink: Send + Sync {
    /// Verify the sink is reachable and the credential is usable.
    async fn connect(&self) -> Result<(), SinkError>;

    /// Post a new report message and return its handle.
    async fn publish(&self, report: &StatsReport) -> Result<MessageHandle, SinkError>;

    /// Replace the contents of an existing report message.
    async fn edit(&self, handle: MessageHandle, report: &StatsReport) -> Result<(), SinkError>;
}
