//! Picker state: data model, load lifecycle, and derived filter state.

/// Load and filter state.
pub mod load;
/// Core value types (items, packs, manifest).
pub mod types;

pub use load::{FilterState, LoadPhase, LoadState};
pub use types::{
    ANIMATED_EXTENSION, IntegrationConfig, Item, ItemRef, Manifest, Pack, PackFile,
};
