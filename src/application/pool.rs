//! The shared "last filtered pool" of job ids.

use std::sync::Arc;

use parking_lot::RwLock;

/// Latest filtered job ids, replaced wholesale each cycle.
///
/// Readers get an `Arc` to a complete set, either the old one or the new one.
#[derive(Debug, Default)]
pub struct JobIdPool {
    ids: RwLock<Arc<Vec<String>>>,
}

impl JobIdPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, ids: Vec<String>) {
        *self.ids.write() = Arc::new(ids);
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<Vec<String>> {
        Arc::clone(&self.ids.read())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.read().is_empty()
    }
}
