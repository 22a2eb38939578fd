use std::collections::{HashMap, HashSet};

use crate::logic::SectionKey;

/// Identity of one rendered element.
///
/// Ids are never reused: an element that leaves the render and comes back is a
/// new element, exactly like a re-created DOM node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    /// Build an id from a raw value (hosts and tests only; the registry allocates real ids).
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Render key of an element; equal keys in consecutive renders keep their id.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementKey {
    /// A list section.
    Section(SectionKey),
    /// An item tile inside a section.
    Tile {
        /// Section holding the tile.
        section: SectionKey,
        /// Item shown by the tile.
        item_id: String,
    },
    /// The icon of a nav strip entry.
    NavIcon(SectionKey),
}

/// A key plus its zero-based repeat count within one render pass.
type Slot = (ElementKey, usize);

/// Assigns stable element ids across renders.
///
/// A render pass calls [`ElementRegistry::begin`], mounts every element it
/// emits, then calls [`ElementRegistry::finish`] to learn which elements
/// disappeared. Mounting the same key twice in one pass yields two elements;
/// the n-th repeat of a key keeps its id across passes.
#[derive(Debug, Default)]
pub struct ElementRegistry {
    /// Next id to hand out.
    next_id: u64,
    /// Elements of the last completed render.
    mounted: HashMap<Slot, ElementId>,
    /// Elements of the render in progress.
    pending: HashMap<Slot, ElementId>,
    /// Mounts per key in the render in progress.
    repeats: HashMap<ElementKey, usize>,
    /// Ids of `mounted`, for membership checks.
    live: HashSet<ElementId>,
}

impl ElementRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a render pass.
    pub fn begin(&mut self) {
        self.pending.clear();
        self.repeats.clear();
    }

    /// What: Mount an element in the current pass.
    ///
    /// Output:
    /// - The element's id from the previous render if the same repeat of its key
    ///   was present there, otherwise a freshly allocated id.
    pub fn mount(&mut self, key: ElementKey) -> ElementId {
        let repeat = self.repeats.entry(key.clone()).or_insert(0);
        let slot = (key, *repeat);
        *repeat += 1;
        let id = match self.mounted.remove(&slot) {
            Some(id) => id,
            None => {
                self.next_id += 1;
                ElementId(self.next_id)
            }
        };
        self.pending.insert(slot, id);
        id
    }

    /// What: Complete the pass.
    ///
    /// Output:
    /// - Ids of elements that were mounted before but not in this pass.
    pub fn finish(&mut self) -> Vec<ElementId> {
        let removed: Vec<ElementId> = self.mounted.drain().map(|(_, id)| id).collect();
        self.mounted = std::mem::take(&mut self.pending);
        self.live = self.mounted.values().copied().collect();
        removed
    }

    /// What: Unmount everything, as when the whole list is torn down.
    ///
    /// Output:
    /// - Ids that were mounted.
    pub fn unmount_all(&mut self) -> Vec<ElementId> {
        self.pending.clear();
        self.repeats.clear();
        self.live.clear();
        self.mounted.drain().map(|(_, id)| id).collect()
    }

    /// Whether `id` belongs to the last completed render.
    #[must_use]
    pub fn is_mounted(&self, id: ElementId) -> bool {
        self.live.contains(&id)
    }

    /// Id currently mounted for the first occurrence of `key`.
    #[must_use]
    pub fn id_of(&self, key: &ElementKey) -> Option<ElementId> {
        self.mounted.get(&(key.clone(), 0)).copied()
    }
}
