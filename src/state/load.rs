//! Load and filter state owned by the orchestrator.

use super::types::Pack;

/// Lifecycle of one pack load sequence.
///
/// `Idle -> Loading -> {Loaded, Errored}`; a reload moves a terminal phase back
/// to `Loading`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadPhase {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A load sequence is in flight; packs may already be arriving.
    Loading,
    /// The sequence finished; a missing manifest also ends here with no packs.
    Loaded,
    /// The sequence failed with a user-visible message.
    Errored(String),
}

impl LoadPhase {
    /// Whether no further packs will arrive for the current generation.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Loaded | Self::Errored(_))
    }
}

/// Loaded packs in display order plus the phase of the sequence producing them.
#[derive(Clone, Debug, Default)]
pub struct LoadState {
    /// Packs appended so far, in manifest declaration order.
    pub packs: Vec<Pack>,
    /// Current phase.
    pub phase: LoadPhase,
}

impl LoadState {
    /// What: Decide whether the spinner should be shown.
    ///
    /// Output:
    /// - `true` while a sequence is pending and no pack has arrived yet.
    ///
    /// Details:
    /// - Packs are displayed progressively, so the first appended pack clears
    ///   this flag even though the sequence is still running.
    #[must_use]
    pub fn loading(&self) -> bool {
        !self.phase.is_terminal() && self.packs.is_empty()
    }

    /// Page-level error message, if the sequence failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            LoadPhase::Errored(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    /// Drop all packs and enter `Loading` for a fresh sequence.
    pub fn restart(&mut self) {
        self.packs.clear();
        self.phase = LoadPhase::Loading;
    }
}

/// Derived search state, recomputed on every keystroke and never persisted.
#[derive(Clone, Debug, Default)]
pub struct FilterState {
    /// Sanitized search term (trimmed, lowercased). Empty means no filter.
    pub term: String,
    /// Pools that still have matching items, in display order.
    pub packs: Vec<Pack>,
}

impl FilterState {
    /// Whether a non-empty term is applied.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.term.is_empty()
    }

    /// Reset to "no filter".
    pub fn clear(&mut self) {
        self.term.clear();
        self.packs.clear();
    }
}
