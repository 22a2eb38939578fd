use std::collections::HashSet;

use super::recent::RECENT_POOL_ID;

/// Anchor id of the settings section.
pub const SETTINGS_SECTION_ID: &str = "settings";

/// Identity of one list section and its matching nav entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionKey {
    /// Recently used row.
    Recent,
    /// A loaded pack, by pack id.
    Pack(String),
    /// Settings panel at the end of the list.
    Settings,
}

impl SectionKey {
    /// What: Map a pool id to its section key.
    ///
    /// Output:
    /// - `Recent` for the recent pool id, `Pack(id)` otherwise.
    #[must_use]
    pub fn for_pool(pool_id: &str) -> Self {
        if pool_id == RECENT_POOL_ID {
            Self::Recent
        } else {
            Self::Pack(pool_id.to_string())
        }
    }

    /// Id used in anchors (`pack-<id>`, `nav-<id>`).
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Recent => RECENT_POOL_ID,
            Self::Pack(id) => id,
            Self::Settings => SETTINGS_SECTION_ID,
        }
    }

    /// Anchor of the section in the list.
    #[must_use]
    pub fn section_anchor(&self) -> String {
        format!("pack-{}", self.id())
    }

    /// Anchor of the entry in the nav strip.
    #[must_use]
    pub fn nav_anchor(&self) -> String {
        format!("nav-{}", self.id())
    }
}

/// Horizontal extent of a nav entry, relative to the strip's left edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// Left edge.
    pub left: f32,
    /// Right edge.
    pub right: f32,
}

/// How an entry is aligned when scrolled into view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollAlign {
    /// Align the entry's left edge with the strip's left edge.
    Start,
    /// Align the entry's right edge with the strip's right edge.
    End,
}

/// Host-side navigation strip the sync drives.
pub trait NavStrip {
    /// Visible width of the strip.
    fn width(&self) -> f32;
    /// Current bounds of the entry for `key`, if it is rendered.
    fn entry_bounds(&self, key: &SectionKey) -> Option<Bounds>;
    /// Toggle the "visible" styling of an entry.
    fn set_entry_visible(&mut self, key: &SectionKey, visible: bool);
    /// Scroll the strip so the entry is in view with the given alignment.
    fn scroll_entry_into_view(&mut self, key: &SectionKey, align: ScrollAlign);
    /// Scroll the strip horizontally by `dx`.
    fn scroll_by(&mut self, dx: f32);
}

/// One reported section visibility change.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionVisibility {
    /// Section that changed; `None` for list children that are not sections.
    pub section: Option<SectionKey>,
    /// Whether it is now intersecting the list viewport.
    pub visible: bool,
}

/// Keeps the nav strip in step with the sections scrolling through the list.
#[derive(Clone, Debug, Default)]
pub struct SectionNavSync {
    /// Sections currently reported visible.
    visible: HashSet<SectionKey>,
}

impl SectionNavSync {
    /// Create a sync with nothing visible.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// What: Apply one batch of section visibility changes to the nav strip.
    ///
    /// Inputs:
    /// - `strip`: Host nav strip.
    /// - `batch`: Changes reported together by one layout pass.
    ///
    /// Output:
    /// - The entry scrolled into view and its alignment, if any.
    ///
    /// Details:
    /// - Every entry mirrors its section's visibility.
    /// - Among entries that became visible in this batch, an entry hanging off the
    ///   left edge is preferred and start-aligned; otherwise the right-most entry
    ///   past the strip's width is end-aligned.
    /// - Entries with no rendered nav counterpart are skipped.
    pub fn handle_batch(
        &mut self,
        strip: &mut dyn NavStrip,
        batch: &[SectionVisibility],
    ) -> Option<(SectionKey, ScrollAlign)> {
        let mut min_x = 0.0_f32;
        let mut max_x = strip.width();
        let mut min_entry: Option<&SectionKey> = None;
        let mut max_entry: Option<&SectionKey> = None;

        for change in batch {
            let Some(key) = change.section.as_ref() else {
                continue;
            };
            let Some(bounds) = strip.entry_bounds(key) else {
                tracing::trace!(section = key.id(), "no nav entry for section");
                continue;
            };
            strip.set_entry_visible(key, change.visible);
            if change.visible {
                self.visible.insert(key.clone());
                if bounds.left < min_x {
                    min_x = bounds.left;
                    min_entry = Some(key);
                } else if bounds.right > max_x {
                    max_x = bounds.right;
                    max_entry = Some(key);
                }
            } else {
                self.visible.remove(key);
            }
        }

        let target = min_entry
            .map(|key| (key.clone(), ScrollAlign::Start))
            .or_else(|| max_entry.map(|key| (key.clone(), ScrollAlign::End)));
        if let Some((key, align)) = &target {
            strip.scroll_entry_into_view(key, *align);
        }
        target
    }

    /// What: Remap vertical wheel input on the strip to horizontal scrolling.
    pub fn wheel(strip: &mut dyn NavStrip, delta_y: f32) {
        strip.scroll_by(delta_y);
    }

    /// Whether a section is currently reported visible.
    #[must_use]
    pub fn is_visible(&self, key: &SectionKey) -> bool {
        self.visible.contains(key)
    }

    /// Forget all visibility, e.g. after the list is torn down.
    pub fn reset(&mut self) {
        self.visible.clear();
    }
}
