//! Detection intake: classify, route, record, and alert.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::stats::StatsStore;
use crate::domain::{parse_generation, Channel, Detection};
use crate::error::Result;
use crate::port::outbound::notifier::{Alert, Notifier};

/// What happened to an accepted detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionOutcome {
    /// Parsed generation value.
    pub value: f64,
    /// Channel the alert went to; `None` when suppressed.
    pub channel: Option<Channel>,
}

pub struct DetectionService {
    stats: Arc<StatsStore>,
    notifier: Arc<dyn Notifier>,
}

impl DetectionService {
    pub fn new(stats: Arc<StatsStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { stats, notifier }
    }

    /// Handle one detection.
    ///
    /// Routing and recording touch the stats file, so they run on the blocking
    /// pool. Alert delivery is handed to the notifier and not awaited.
    pub async fn handle(&self, detection: Detection) -> Result<DetectionOutcome> {
        let (outcome, alert) = self
            .stats
            .run_blocking(move |stats| {
                let now = Utc::now();
                let value = parse_generation(&detection.generation);
                let channel = stats.route(value);
                stats.record_at(&detection, now);
                let alert = Alert::new(&detection, value, stats.place_id(), now);
                (DetectionOutcome { value, channel }, alert)
            })
            .await?;

        match outcome.channel {
            Some(channel) => {
                info!(
                    name = %alert.name,
                    generation = %alert.generation,
                    channel = %channel,
                    "Detection routed"
                );
                self.notifier.notify(channel, alert);
            }
            None => debug!(
                name = %alert.name,
                value = outcome.value,
                "Detection below alert threshold"
            ),
        }

        Ok(outcome)
    }
}
