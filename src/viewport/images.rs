use std::collections::HashMap;

use super::{ElementId, ObservedSet, ObserverOptions, VisibilityEntry, VisibilitySource};

/// Margin beyond the visible list area at which thumbnails start loading.
pub const IMAGE_ROOT_MARGIN_PX: u32 = 100;

/// Source state of one thumbnail tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileImage {
    /// Thumbnail location waiting to be applied.
    pub pending_src: String,
    /// Active source; `None` lets the host release the decoded bitmap.
    pub src: Option<String>,
    /// Whether the tile is inside the extended viewport.
    pub visible: bool,
}

/// Toggles thumbnail sources as tiles enter and leave the extended viewport.
pub struct ImageObserver {
    /// Host source watching the tiles.
    observed: ObservedSet,
    /// Per-tile source state.
    tiles: HashMap<ElementId, TileImage>,
    /// Options the host source was created with.
    options: ObserverOptions,
}

impl ImageObserver {
    /// What: Wrap a host visibility source configured with `options`.
    #[must_use]
    pub fn new(source: Box<dyn VisibilitySource>, options: ObserverOptions) -> Self {
        Self {
            observed: ObservedSet::new(source),
            tiles: HashMap::new(),
            options,
        }
    }

    /// Default options: a [`IMAGE_ROOT_MARGIN_PX`] margin around the list.
    #[must_use]
    pub const fn default_options() -> ObserverOptions {
        ObserverOptions {
            root_margin_px: IMAGE_ROOT_MARGIN_PX,
        }
    }

    /// Options in effect.
    #[must_use]
    pub const fn options(&self) -> ObserverOptions {
        self.options
    }

    /// What: Start watching a thumbnail tile.
    ///
    /// Inputs:
    /// - `element`: Tile element.
    /// - `pending_src`: Thumbnail location to apply on enter.
    ///
    /// Details:
    /// - Cheap no-op for tiles that are already watched; the current source is kept.
    pub fn attach(&mut self, element: ElementId, pending_src: &str) {
        self.tiles
            .entry(element)
            .and_modify(|tile| {
                if tile.pending_src != pending_src {
                    tile.pending_src = pending_src.to_string();
                }
            })
            .or_insert_with(|| TileImage {
                pending_src: pending_src.to_string(),
                src: None,
                visible: false,
            });
        self.observed.observe(element);
    }

    /// Stop watching a tile that was unmounted.
    pub fn detach(&mut self, element: ElementId) {
        self.tiles.remove(&element);
        self.observed.unobserve(element);
    }

    /// What: Apply a batch of visibility changes.
    ///
    /// Details:
    /// - Enter sets the source from the pending location; leave clears it.
    /// - Repeated reports are harmless; unknown elements are ignored.
    pub fn handle(&mut self, entries: &[VisibilityEntry]) {
        for entry in entries {
            let Some(tile) = self.tiles.get_mut(&entry.element) else {
                continue;
            };
            if entry.visible {
                tile.src = Some(tile.pending_src.clone());
                tile.visible = true;
            } else {
                tile.src = None;
                tile.visible = false;
            }
        }
        tracing::trace!(entries = entries.len(), "image visibility batch");
    }

    /// Release every watch and forget all tiles.
    pub fn disconnect(&mut self) {
        self.observed.disconnect();
        self.tiles.clear();
    }

    /// Source state of a tile.
    #[must_use]
    pub fn tile(&self, element: ElementId) -> Option<&TileImage> {
        self.tiles.get(&element)
    }

    /// Number of watched tiles.
    #[must_use]
    pub fn watched(&self) -> usize {
        self.observed.len()
    }
}
