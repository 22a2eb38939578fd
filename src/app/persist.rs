use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;

/// Key holding the stickers-per-row preference.
pub const KEY_STICKERS_PER_ROW: &str = "stickers_per_row";
/// Key holding the explicit theme override.
pub const KEY_THEME_OVERRIDE: &str = "theme_override";
/// Key holding the resolved recent stickers snapshot.
pub const KEY_RECENT_CACHE: &str = "recent_cache";

/// Host key-value storage for small client preferences.
pub trait ClientStore {
    /// Stored value for `key`.
    fn get(&self, key: &str) -> Option<String>;
    /// Store `value` under `key`.
    fn set(&mut self, key: &str, value: &str);
    /// Delete `key`.
    fn remove(&mut self, key: &str);
}

/// In-memory store, for tests and ephemeral sessions.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    /// Stored values.
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClientStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// Write-through store persisted as one JSON object.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    /// Backing file.
    path: PathBuf,
    /// Current values.
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// What: Open the store at `path`.
    ///
    /// Details:
    /// - A missing file starts empty; a malformed file is logged and ignored.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "[Persist] Client state is malformed; starting empty"
                );
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self { path, values }
    }

    /// Write the current values to disk, logging failures.
    fn flush(&self) {
        let Ok(s) = serde_json::to_string_pretty(&self.values) else {
            return;
        };
        match fs::write(&self.path, &s) {
            Ok(()) => {
                tracing::trace!(
                    path = %self.path.display(),
                    bytes = s.len(),
                    "[Persist] Client state persisted"
                );
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "[Persist] Failed to write client state"
                );
            }
        }
    }
}

impl ClientStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        if self.values.get(key).map(String::as_str) == Some(value) {
            return;
        }
        self.values.insert(key.to_string(), value.to_string());
        self.flush();
    }

    fn remove(&mut self, key: &str) {
        if self.values.remove(key).is_some() {
            self.flush();
        }
    }
}
