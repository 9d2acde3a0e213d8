//! Server listing entries and the player-count filter.

use serde::Deserialize;

/// One entry of the upstream server listing.
///
/// Only the fields the filter needs are kept; the rest of the upstream record
/// is ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub playing: Option<u32>,
}

impl ServerEntry {
    #[must_use]
    pub fn new(id: impl Into<String>, playing: u32) -> Self {
        Self {
            id: Some(id.into()),
            playing: Some(playing),
        }
    }

    /// Player count, treating a missing value as zero.
    #[must_use]
    pub fn playing(&self) -> u32 {
        self.playing.unwrap_or(0)
    }
}

/// Inclusive player-count bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerRange {
    min: u32,
    max: u32,
}

impl PlayerRange {
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub const fn min(&self) -> u32 {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    #[must_use]
    pub const fn contains(&self, playing: u32) -> bool {
        self.min <= playing && playing <= self.max
    }
}

/// Ids of every entry whose player count falls inside `range`, in input order.
///
/// Entries without an id are skipped.
#[must_use]
pub fn filter_job_ids(entries: &[ServerEntry], range: PlayerRange) -> Vec<String> {
    entries
        .iter()
        .filter(|entry| range.contains(entry.playing()))
        .filter_map(|entry| entry.id.clone())
        .collect()
}
