//! Picker application module.
//!
//! The [`App`] orchestrator owns all picker state, spawns the background
//! workers, and turns every state change into a fresh [`crate::ui::Frame`].

/// Host key-value store for client preferences.
pub mod persist;
/// Orchestrator state and lifecycle.
mod picker;
/// LRU-backed recently used store.
pub mod recent;
/// Background workers (pack loader, animation pipeline).
pub mod workers;

pub use persist::{ClientStore, JsonFileStore, MemoryStore};
pub use picker::{App, AppConfig, Collaborators, StickerSink};
pub use recent::LruRecencyStore;
