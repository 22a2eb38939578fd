//! Core non-UI logic split into modular submodules.

/// Search filter over pools.
pub mod filter;
/// Section visibility to nav strip synchronisation.
pub mod nav;
/// Recently used resolution.
pub mod recent;

pub use filter::{filter_pools, sanitize};
pub use nav::{
    Bounds, NavStrip, SETTINGS_SECTION_ID, ScrollAlign, SectionKey, SectionNavSync,
    SectionVisibility,
};
pub use recent::{RECENT_POOL_ID, RECENT_POOL_TITLE, RecencyResolver, RecencyStore};
