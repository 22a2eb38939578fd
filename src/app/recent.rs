use std::fs;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use lru::LruCache;

use crate::logic::RecencyStore;

/// Default number of recently used ids kept.
pub const DEFAULT_RECENT_CAPACITY: usize = 16;

/// Bounded most-recently-used id list backed by an LRU cache and an optional JSON file.
#[derive(Debug)]
pub struct LruRecencyStore {
    /// Ids, most recent first.
    ids: LruCache<String, ()>,
    /// Backing file, if persisted.
    path: Option<PathBuf>,
    /// Whether `ids` changed since the last flush.
    dirty: bool,
}

impl LruRecencyStore {
    /// What: Create an unpersisted store keeping at most `capacity` ids.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity)
            .or_else(|| NonZeroUsize::new(DEFAULT_RECENT_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            ids: LruCache::new(cap),
            path: None,
            dirty: false,
        }
    }

    /// What: Open a persisted store.
    ///
    /// Details:
    /// - The file holds a JSON array of ids, most recent first. Missing or malformed
    ///   content starts empty.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>, capacity: usize) -> Self {
        let path = path.into();
        let mut store = Self::new(capacity);
        if let Ok(s) = fs::read_to_string(&path) {
            match serde_json::from_str::<Vec<String>>(&s) {
                Ok(ids) => {
                    // Oldest first so the most recent ends up at the front.
                    for id in ids.into_iter().rev() {
                        store.ids.put(id, ());
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "[Recent] Ignoring malformed recent stickers file"
                    );
                }
            }
        }
        store.path = Some(path);
        store
    }

    /// What: Persist the id list if it changed.
    ///
    /// Details:
    /// - Clears the dirty flag even when the write fails, to avoid repeated attempts.
    pub fn maybe_flush(&mut self) {
        if !self.dirty {
            return;
        }
        self.dirty = false;
        let Some(path) = self.path.as_ref() else {
            return;
        };
        let ids = RecencyStore::ids(self);
        if let Ok(s) = serde_json::to_string(&ids) {
            match fs::write(path, &s) {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), count = ids.len(), "[Recent] Recent stickers persisted");
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "[Recent] Failed to write recent stickers"
                    );
                }
            }
        }
    }
}

impl RecencyStore for LruRecencyStore {
    fn ids(&self) -> Vec<String> {
        self.ids.iter().map(|(id, _)| id.clone()).collect()
    }

    fn add(&mut self, id: &str) {
        self.ids.put(id.to_string(), ());
        self.dirty = true;
        self.maybe_flush();
    }
}
