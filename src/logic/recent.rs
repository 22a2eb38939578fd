use crate::index::{ItemIndex, encode_snapshot};
use crate::state::Pack;

/// Pool id of the recently used row.
pub const RECENT_POOL_ID: &str = "frequently-used";
/// Section title of the recently used row.
pub const RECENT_POOL_TITLE: &str = "Frequently used";

/// External ranking store for recently used items.
///
/// Only the contract is consumed here; ordering and bounding policy belong to
/// the implementation.
pub trait RecencyStore {
    /// Ids in display order, most relevant first.
    fn ids(&self) -> Vec<String>;
    /// Record a use of `id`, moving it to the front.
    fn add(&mut self, id: &str);
}

/// Turns the store's id list into renderable items via the item index.
#[derive(Clone, Debug)]
pub struct RecencyResolver {
    /// Ids as last read from the store.
    ids: Vec<String>,
    /// Resolved pool rendered as the first section.
    pool: Pack,
}

impl Default for RecencyResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl RecencyResolver {
    /// Create a resolver with an empty recent pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ids: Vec::new(),
            pool: Pack::empty(RECENT_POOL_ID, RECENT_POOL_TITLE),
        }
    }

    /// What: Re-read the store and resolve its ids against the index.
    ///
    /// Inputs:
    /// - `store`: External recency store.
    /// - `index`: Current item index.
    ///
    /// Output:
    /// - The refreshed pool. Ids the index does not know yet are left out and will
    ///   appear on a later refresh once their pack has loaded.
    pub fn refresh(&mut self, store: &dyn RecencyStore, index: &ItemIndex) -> &Pack {
        self.ids = store.ids();
        self.pool.items = index.resolve(&self.ids);
        tracing::debug!(
            ids = self.ids.len(),
            resolved = self.pool.items.len(),
            "[Recent] Resolved recent stickers"
        );
        &self.pool
    }

    /// Resolved recent pool.
    #[must_use]
    pub const fn pool(&self) -> &Pack {
        &self.pool
    }

    /// Ids as last read from the store, including unresolved ones.
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Serialized snapshot of the resolved items for the next session.
    #[must_use]
    pub fn snapshot(&self) -> String {
        encode_snapshot(&self.pool.items)
    }
}
