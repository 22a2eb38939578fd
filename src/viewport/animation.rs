use std::collections::HashMap;

use super::{ElementId, ObservedSet, VisibilityEntry, VisibilitySource};

/// Request to run the animation pipeline for one element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimationJob {
    /// Container element that will host the animation.
    pub element: ElementId,
    /// Location of the compressed animation.
    pub url: String,
}

/// Lifecycle of an animated element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationStatus {
    /// Watched, not yet visible.
    Waiting,
    /// Pipeline started.
    Loading,
    /// Renderer accepted the animation.
    Playing,
    /// Pipeline failed; the element stays empty.
    Failed,
}

/// Starts the animation pipeline at most once per element, the first time the
/// element becomes visible.
pub struct AnimationLoader {
    /// Host source watching animated elements.
    observed: ObservedSet,
    /// Urls of elements still waiting for their first visibility.
    waiting: HashMap<ElementId, String>,
    /// Status of every known element. Anything past `Waiting` counts as processed.
    status: HashMap<ElementId, AnimationStatus>,
}

impl AnimationLoader {
    /// Wrap a host visibility source.
    #[must_use]
    pub fn new(source: Box<dyn VisibilitySource>) -> Self {
        Self {
            observed: ObservedSet::new(source),
            waiting: HashMap::new(),
            status: HashMap::new(),
        }
    }

    /// What: Watch an animated element until its first visibility.
    ///
    /// Details:
    /// - Elements that are already waiting or processed are left alone.
    pub fn observe(&mut self, element: ElementId, url: &str) {
        if self.status.contains_key(&element) {
            return;
        }
        self.status.insert(element, AnimationStatus::Waiting);
        self.waiting.insert(element, url.to_string());
        self.observed.observe(element);
    }

    /// What: Start an element immediately, bypassing visibility (nav strip icons).
    ///
    /// Output:
    /// - A job the first time the element is started, `None` afterwards.
    pub fn start_now(&mut self, element: ElementId, url: &str) -> Option<AnimationJob> {
        match self.status.get(&element) {
            None | Some(AnimationStatus::Waiting) => {}
            Some(_) => return None,
        }
        self.waiting.remove(&element);
        self.observed.unobserve(element);
        self.status.insert(element, AnimationStatus::Loading);
        Some(AnimationJob {
            element,
            url: url.to_string(),
        })
    }

    /// What: Process a batch of visibility changes.
    ///
    /// Output:
    /// - One job per element that became visible for the first time.
    ///
    /// Details:
    /// - Started elements are unobserved and marked processed before the job is
    ///   returned, so duplicate enter reports never start a second pipeline.
    pub fn handle(&mut self, entries: &[VisibilityEntry]) -> Vec<AnimationJob> {
        let mut jobs = Vec::new();
        for entry in entries.iter().filter(|e| e.visible) {
            let Some(url) = self.waiting.remove(&entry.element) else {
                continue;
            };
            self.observed.unobserve(entry.element);
            self.status.insert(entry.element, AnimationStatus::Loading);
            jobs.push(AnimationJob {
                element: entry.element,
                url,
            });
        }
        jobs
    }

    /// What: Record the outcome of a started pipeline.
    ///
    /// Details:
    /// - Ignored for elements that were forgotten while the pipeline ran.
    pub fn complete(&mut self, element: ElementId, ok: bool) {
        if let Some(status) = self.status.get_mut(&element) {
            *status = if ok {
                AnimationStatus::Playing
            } else {
                AnimationStatus::Failed
            };
        }
    }

    /// Forget an unmounted element.
    pub fn forget(&mut self, element: ElementId) {
        self.waiting.remove(&element);
        self.status.remove(&element);
        self.observed.unobserve(element);
    }

    /// Release every watch and forget all elements.
    pub fn disconnect(&mut self) {
        self.observed.disconnect();
        self.waiting.clear();
        self.status.clear();
    }

    /// Status of an element.
    #[must_use]
    pub fn status(&self, element: ElementId) -> Option<AnimationStatus> {
        self.status.get(&element).copied()
    }

    /// Whether an element is still tracked (not forgotten).
    #[must_use]
    pub fn is_tracked(&self, element: ElementId) -> bool {
        self.status.contains_key(&element)
    }
}
