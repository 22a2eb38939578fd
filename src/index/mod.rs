//! Session-scoped item index: id -> item lookup cache.
//!
//! The index is owned by the orchestrator and passed explicitly to whoever needs
//! it. It only grows: later merges overwrite entries that share an id, nothing
//! is ever evicted. Packs keep their own item handles, so the index is a lookup
//! cache rather than the source of truth for rendering.

use std::collections::HashMap;

use crate::state::ItemRef;

/// Recency snapshot encoding and decoding.
mod persist;

pub use persist::{decode_snapshot, encode_snapshot};

/// Mapping from item id to the most recently loaded copy of that item.
#[derive(Clone, Debug, Default)]
pub struct ItemIndex {
    /// Items keyed by id.
    by_id: HashMap<String, ItemRef>,
}

impl ItemIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// What: Look up an item by id.
    ///
    /// Output:
    /// - A shared handle to the latest copy, or `None` when the id is not loaded yet.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<ItemRef> {
        self.by_id.get(id).cloned()
    }

    /// What: Merge items into the index, overwriting existing ids.
    ///
    /// Inputs:
    /// - `items`: Handles to insert, in load order.
    pub fn merge_many<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = ItemRef>,
    {
        for item in items {
            self.by_id.insert(item.id.clone(), item);
        }
    }

    /// What: Resolve an ordered id list to items, skipping ids not in the index.
    ///
    /// Output:
    /// - Items in the order of `ids`; unknown ids are dropped without placeholders.
    #[must_use]
    pub fn resolve(&self, ids: &[String]) -> Vec<ItemRef> {
        ids.iter().filter_map(|id| self.get(id)).collect()
    }

    /// Number of distinct ids known.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether nothing has been merged yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
