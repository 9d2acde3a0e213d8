//! Tiered routing of detections to notification channels.

use std::fmt;

const LOW_TIER_FLOOR: f64 = 1_000_000.0;
const MID_TIER_FLOOR: f64 = 10_000_000.0;
const HIGH_TIER_FLOOR: f64 = 100_000_000.0;

/// Classification band for a generation value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// `value <= 1M`; never delivered.
    Suppressed,
    /// `1M < value <= 10M`; alternates between the two rotation channels.
    Low,
    /// `10M < value <= 100M`.
    Mid,
    /// `value > 100M`.
    High,
}

impl Tier {
    /// Classify a value. `NaN` is suppressed.
    #[must_use]
    pub fn classify(value: f64) -> Self {
        if value > HIGH_TIER_FLOOR {
            Self::High
        } else if value > MID_TIER_FLOOR {
            Self::Mid
        } else if value > LOW_TIER_FLOOR {
            Self::Low
        } else {
            Self::Suppressed
        }
    }
}

/// Output channel a detection is delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// First low-tier rotation channel (A1).
    RotationPrimary,
    /// Second low-tier rotation channel (A2).
    RotationSecondary,
    /// Mid-tier channel (B).
    Mid,
    /// High-tier channel (C).
    High,
}

impl Channel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RotationPrimary => "a1",
            Self::RotationSecondary => "a2",
            Self::Mid => "b",
            Self::High => "c",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rotation state for the low tier.
///
/// The flag flips exactly once per low-tier decision and is left alone by
/// every other tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterState {
    pub use_first_channel: bool,
}

impl Default for RouterState {
    fn default() -> Self {
        Self {
            use_first_channel: true,
        }
    }
}

impl RouterState {
    /// Pick the channel for `value`, advancing the rotation on low-tier hits.
    pub fn route(&mut self, value: f64) -> Option<Channel> {
        match Tier::classify(value) {
            Tier::Suppressed => None,
            Tier::Low => {
                let channel = if self.use_first_channel {
                    Channel::RotationPrimary
                } else {
                    Channel::RotationSecondary
                };
                self.use_first_channel = !self.use_first_channel;
                Some(channel)
            }
            Tier::Mid => Some(Channel::Mid),
            Tier::High => Some(Channel::High),
        }
    }
}
