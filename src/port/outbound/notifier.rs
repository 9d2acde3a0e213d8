//! Notifier port for detection alerts.
//!
//! Alerts are routed to one of several channels before they reach a
//! notifier; the notifier only knows how to deliver to a channel.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::{Channel, Detection};

/// A routed detection, ready for delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub name: String,
    /// Generation rate as reported.
    pub generation: String,
    /// Parsed generation value used for routing.
    pub value: f64,
    pub rarity: String,
    pub job_id: String,
    pub place_id: String,
    pub detected_at: DateTime<Utc>,
}

impl Alert {
    #[must_use]
    pub fn new(detection: &Detection, value: f64, place_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            name: detection.name.clone(),
            generation: detection.generation.clone(),
            value,
            rarity: detection.rarity.clone(),
            job_id: detection.job_id.clone(),
            place_id: place_id.to_string(),
            detected_at: now,
        }
    }
}

/// Trait for alert delivery.
///
/// Notifications are fire-and-forget.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - `notify` must return quickly; slow I/O belongs on a background task
/// - Delivery failures are logged by the implementation, never returned
pub trait Notifier: Send + Sync {
    fn notify(&self, channel: Channel, alert: Alert);
}

/// A notifier that only logs alerts via tracing.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, channel: Channel, alert: Alert) {
        info!(
            channel = %channel,
            name = %alert.name,
            generation = %alert.generation,
            job_id = %alert.job_id,
            "Detection alert"
        );
    }
}
