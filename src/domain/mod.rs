//! Transport-agnostic domain logic.

pub mod channel;
pub mod generation;
pub mod proxy;
pub mod server;
pub mod stats;

pub use channel::{Channel, RouterState, Tier};
pub use generation::parse_generation;
pub use proxy::{ProxyEndpoint, ProxyPool};
pub use server::{filter_job_ids, PlayerRange, ServerEntry};
pub use stats::{
    Detection, HistoryEntry, MessageHandle, PersistedStats, StatsReport, StatsState,
};
