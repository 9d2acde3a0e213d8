//! JSON file persistence for the pool and stats snapshots.

mod dto;

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::PersistedStats;
use crate::error::{Error, Result};
use crate::port::outbound::store::StateStore;

use dto::{CacheFile, PoolFile};

/// Stores each snapshot as a pretty-printed JSON file, replaced atomically.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    pool_path: PathBuf,
    cache_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(pool_path: impl Into<PathBuf>, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            pool_path: pool_path.into(),
            cache_path: cache_path.into(),
        }
    }

    #[must_use]
    pub fn pool_path(&self) -> &Path {
        &self.pool_path
    }

    #[must_use]
    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }
}

impl StateStore for JsonFileStore {
    fn save_pool(&self, job_ids: &[String]) -> Result<()> {
        write_json(
            &self.pool_path,
            &PoolFile {
                servers: job_ids.to_vec(),
            },
        )
    }

    fn load_pool(&self) -> Result<Option<Vec<String>>> {
        Ok(read_json::<PoolFile>(&self.pool_path)?.map(|file| file.servers))
    }

    fn save_stats(&self, stats: &PersistedStats) -> Result<()> {
        write_json(&self.cache_path, &CacheFile::from(stats))
    }

    fn load_stats(&self) -> Result<Option<PersistedStats>> {
        Ok(read_json::<CacheFile>(&self.cache_path)?.map(PersistedStats::from))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| Error::Persistence(format!("{}: {e}", path.display())))
}

/// Write to a sibling temp file, then rename over the target.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    let cleanup_and_err = |e: std::io::Error| {
        let _ = fs::remove_file(&temp_path);
        e
    };

    let mut file = fs::File::create(&temp_path)?;
    file.write_all(json.as_bytes()).map_err(cleanup_and_err)?;
    file.sync_all().map_err(cleanup_and_err)?;
    fs::rename(&temp_path, path).map_err(cleanup_and_err)?;

    Ok(())
}
