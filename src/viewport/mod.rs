//! Viewport-driven lazy asset engine.
//!
//! Rendered elements get stable identities from an [`ElementRegistry`]. Hosts
//! report visibility through [`VisibilitySource`] implementations; the engine
//! reacts by toggling image sources ([`ImageObserver`]) and by starting the
//! one-shot animation pipeline ([`AnimationLoader`]).

use std::collections::HashSet;

/// One-shot animation loading per element.
mod animation;
/// Animation decode capabilities and data.
mod decode;
/// Margin-extended image source toggling.
mod images;
/// Element identity across renders.
mod registry;

pub use animation::{AnimationJob, AnimationLoader, AnimationStatus};
pub use decode::{
    AnimationData, AnimationError, AnimationRenderer, Decompressor, GzipDecompressor,
    PlaybackOptions, RendererKind, decode_animation,
};
pub use images::{IMAGE_ROOT_MARGIN_PX, ImageObserver, TileImage};
pub use registry::{ElementId, ElementKey, ElementRegistry};

/// Tuning for a visibility source, applied by the host when it is created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ObserverOptions {
    /// Extra margin around the visible area, in pixels, that still counts as visible.
    pub root_margin_px: u32,
}

/// One element entering or leaving the tracked region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibilityEntry {
    /// Element that changed.
    pub element: ElementId,
    /// `true` on enter, `false` on leave.
    pub visible: bool,
}

impl VisibilityEntry {
    /// Entry reporting that `element` became visible.
    #[must_use]
    pub const fn enter(element: ElementId) -> Self {
        Self {
            element,
            visible: true,
        }
    }

    /// Entry reporting that `element` stopped being visible.
    #[must_use]
    pub const fn leave(element: ElementId) -> Self {
        Self {
            element,
            visible: false,
        }
    }
}

/// Host capability that watches elements and later reports batches of
/// [`VisibilityEntry`] back to the engine.
///
/// Any element may be reported several times; consumers are idempotent.
pub trait VisibilitySource {
    /// Start watching `element`.
    fn observe(&mut self, element: ElementId);
    /// Stop watching `element`.
    fn unobserve(&mut self, element: ElementId);
    /// Stop watching everything.
    fn disconnect(&mut self);
}

/// A visibility source plus the set of elements it is watching, so repeated
/// attach passes only forward new elements.
pub struct ObservedSet {
    /// Host source.
    source: Box<dyn VisibilitySource>,
    /// Elements currently watched.
    observed: HashSet<ElementId>,
}

impl ObservedSet {
    /// Wrap a host source.
    #[must_use]
    pub fn new(source: Box<dyn VisibilitySource>) -> Self {
        Self {
            source,
            observed: HashSet::new(),
        }
    }

    /// What: Watch `element` unless it is already watched.
    ///
    /// Output:
    /// - `true` when the element was newly forwarded to the source.
    pub fn observe(&mut self, element: ElementId) -> bool {
        if self.observed.insert(element) {
            self.source.observe(element);
            true
        } else {
            false
        }
    }

    /// Stop watching `element` if it is watched.
    pub fn unobserve(&mut self, element: ElementId) {
        if self.observed.remove(&element) {
            self.source.unobserve(element);
        }
    }

    /// Drop every watch.
    pub fn disconnect(&mut self) {
        self.observed.clear();
        self.source.disconnect();
    }

    /// Whether `element` is watched.
    #[must_use]
    pub fn contains(&self, element: ElementId) -> bool {
        self.observed.contains(&element)
    }

    /// Number of watched elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observed.len()
    }

    /// Whether nothing is watched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeVisibility;

    #[test]
    /// What: Re-attaching an observed element is a no-op for the host source.
    ///
    /// Inputs:
    /// - Observe the same element twice, then another, then unobserve and disconnect.
    ///
    /// Output:
    /// - Host sees each element once; disconnect clears the watch set.
    fn observe_forwards_new_elements_only() {
        let fake = FakeVisibility::default();
        let mut set = ObservedSet::new(Box::new(fake.clone()));
        let a = ElementId::from_raw(1);
        let b = ElementId::from_raw(2);

        assert!(set.observe(a));
        assert!(!set.observe(a));
        assert!(set.observe(b));
        assert_eq!(fake.observe_calls(), vec![a, b]);

        set.unobserve(a);
        assert!(!set.contains(a));
        assert!(!fake.is_observed(a));

        set.disconnect();
        assert!(set.is_empty());
        assert_eq!(fake.disconnects(), 1);
    }
}
