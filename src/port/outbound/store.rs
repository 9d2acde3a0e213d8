//! Durable state port.
//!
//! Two independent snapshots are kept: the last filtered pool and the stats
//! cache. Both are overwritten wholesale on every save.

use crate::domain::PersistedStats;
use crate::error::Result;

pub trait StateStore: Send + Sync {
    /// Overwrite the pool snapshot.
    fn save_pool(&self, job_ids: &[String]) -> Result<()>;

    /// Read the pool snapshot; `Ok(None)` when none exists yet.
    fn load_pool(&self) -> Result<Option<Vec<String>>>;

    /// Overwrite the stats snapshot.
    fn save_stats(&self, stats: &PersistedStats) -> Result<()>;

    /// Read the stats snapshot; `Ok(None)` when none exists yet.
    fn load_stats(&self) -> Result<Option<PersistedStats>>;
}
