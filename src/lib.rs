//! Headless sticker picker core.
//!
//! Loads sticker packs progressively from a manifest, keeps a session-wide item
//! index, resolves the recently used row, filters by search term, drives
//! viewport-based thumbnail and animation loading, and keeps the nav strip in
//! step with the visible sections. Hosts plug in through small capability
//! traits (fetching, visibility, rendering, persistence, delivery).

pub mod app;
pub mod args;
pub mod catalog;
pub mod index;
pub mod logic;
pub mod sources;
pub mod state;
pub mod theme;
pub mod ui;
pub mod viewport;

#[cfg(test)]
mod test_utils;
