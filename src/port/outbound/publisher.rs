//! Downstream aggregator port.

use async_trait::async_trait;

use crate::error::Result;

/// Acknowledgement returned by the aggregator.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishReceipt {
    /// The aggregator's `added` field, whatever shape it has.
    pub added: Option<serde_json::Value>,
}

/// Pushes the filtered pool to the downstream aggregator.
///
/// One attempt per call; a failed push is superseded by the next cycle.
#[async_trait]
pub trait PoolPublisher: Send + Sync {
    async fn publish(&self, job_ids: &[String]) -> Result<PublishReceipt>;
}
