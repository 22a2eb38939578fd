//! Test utilities for common test setup.
//!
//! Fakes for every host capability the picker consumes, shared across the
//! in-crate test modules.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::app::StickerSink;
use crate::logic::{Bounds, NavStrip, RecencyStore, ScrollAlign, SectionKey};
use crate::sources::{CacheMode, FetchError, FetchResponse, Fetcher};
use crate::state::{Item, ItemRef};
use crate::viewport::{
    AnimationData, AnimationError, AnimationRenderer, ElementId, PlaybackOptions,
    VisibilitySource,
};

/// What: Gzip-compress `bytes` the way `.tgs` assets are stored.
pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut enc = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    enc.write_all(bytes).expect("gzip write");
    enc.finish().expect("gzip finish")
}

/// What: Build a shared item with a derived label.
pub fn item(id: &str, url: &str) -> ItemRef {
    Arc::new(Item {
        id: id.to_string(),
        url: url.to_string(),
        body: format!("{id} sticker"),
        extra: serde_json::Map::new(),
    })
}

/// Scripted reply of the fake fetcher.
#[derive(Clone, Debug)]
enum Reply {
    /// A response with this status and body.
    Response(FetchResponse),
    /// A transport failure with this message.
    Fail(String),
    /// The fetching task panics.
    Panic,
}

#[derive(Debug, Default)]
struct FetcherInner {
    replies: Mutex<HashMap<String, Reply>>,
    delays: Mutex<HashMap<String, Duration>>,
    calls: Mutex<Vec<(String, CacheMode)>>,
}

/// Fetcher answering from a URL table; unknown URLs get `404 Not Found`.
///
/// Clones share the table and the call log.
#[derive(Clone, Debug, Default)]
pub struct FakeFetcher {
    inner: Arc<FetcherInner>,
}

impl FakeFetcher {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to `url` with `200` and a JSON body.
    pub fn json(self, url: &str, body: &str) -> Self {
        self.set(url, Reply::Response(FetchResponse::ok(body.as_bytes().to_vec())));
        self
    }

    /// Reply to `url` with `200` and raw bytes.
    pub fn bytes(self, url: &str, body: Vec<u8>) -> Self {
        self.set(url, Reply::Response(FetchResponse::ok(body)));
        self
    }

    /// Reply to `url` with a bodiless status.
    pub fn status(self, url: &str, status: u16, text: &str) -> Self {
        self.set(url, Reply::Response(FetchResponse::status(status, text)));
        self
    }

    /// Fail `url` at the transport level.
    pub fn fail(self, url: &str, message: &str) -> Self {
        self.set(url, Reply::Fail(message.to_string()));
        self
    }

    /// Panic while fetching `url`.
    pub fn panic(self, url: &str) -> Self {
        self.set(url, Reply::Panic);
        self
    }

    /// Delay replies to `url`.
    pub fn delay(self, url: &str, delay: Duration) -> Self {
        self.inner
            .delays
            .lock()
            .expect("delays lock")
            .insert(url.to_string(), delay);
        self
    }

    /// Number of requests made for `url`.
    pub fn calls(&self, url: &str) -> usize {
        self.inner
            .calls
            .lock()
            .expect("calls lock")
            .iter()
            .filter(|(u, _)| u == url)
            .count()
    }

    /// Cache mode of the most recent request for `url`.
    pub fn last_cache_mode(&self, url: &str) -> Option<CacheMode> {
        self.inner
            .calls
            .lock()
            .expect("calls lock")
            .iter()
            .rev()
            .find(|(u, _)| u == url)
            .map(|(_, mode)| *mode)
    }

    fn set(&self, url: &str, reply: Reply) {
        self.inner
            .replies
            .lock()
            .expect("replies lock")
            .insert(url.to_string(), reply);
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, url: &str, cache: CacheMode) -> crate::sources::Result<FetchResponse> {
        self.inner
            .calls
            .lock()
            .expect("calls lock")
            .push((url.to_string(), cache));
        let delay = self
            .inner
            .delays
            .lock()
            .expect("delays lock")
            .get(url)
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let reply = self
            .inner
            .replies
            .lock()
            .expect("replies lock")
            .get(url)
            .cloned();
        match reply {
            Some(Reply::Response(r)) => Ok(r),
            Some(Reply::Fail(msg)) => Err(FetchError::Transport(msg)),
            Some(Reply::Panic) => panic!("fetch of {url} panicked"),
            None => Ok(FetchResponse::status(404, "Not Found")),
        }
    }
}

#[derive(Debug, Default)]
struct VisibilityInner {
    observed: HashSet<ElementId>,
    observe_calls: Vec<ElementId>,
    disconnects: usize,
}

/// Visibility source that records watches; clones share state.
#[derive(Clone, Debug, Default)]
pub struct FakeVisibility {
    inner: Rc<RefCell<VisibilityInner>>,
}

impl FakeVisibility {
    /// Every `observe` call in order.
    pub fn observe_calls(&self) -> Vec<ElementId> {
        self.inner.borrow().observe_calls.clone()
    }

    /// Whether `element` is currently watched.
    pub fn is_observed(&self, element: ElementId) -> bool {
        self.inner.borrow().observed.contains(&element)
    }

    /// Number of currently watched elements.
    pub fn observed_count(&self) -> usize {
        self.inner.borrow().observed.len()
    }

    /// Number of `disconnect` calls.
    pub fn disconnects(&self) -> usize {
        self.inner.borrow().disconnects
    }
}

impl VisibilitySource for FakeVisibility {
    fn observe(&mut self, element: ElementId) {
        let mut inner = self.inner.borrow_mut();
        inner.observed.insert(element);
        inner.observe_calls.push(element);
    }

    fn unobserve(&mut self, element: ElementId) {
        self.inner.borrow_mut().observed.remove(&element);
    }

    fn disconnect(&mut self) {
        let mut inner = self.inner.borrow_mut();
        inner.observed.clear();
        inner.disconnects += 1;
    }
}

/// Nav strip with fixed entry positions.
#[derive(Debug, Default)]
pub struct FakeNavStrip {
    /// Strip width.
    pub width: f32,
    /// Entry bounds by section.
    pub bounds: HashMap<SectionKey, Bounds>,
    /// Entries marked visible.
    pub visible: HashSet<SectionKey>,
    /// Scroll-into-view calls in order.
    pub scrolls: Vec<(SectionKey, ScrollAlign)>,
    /// Accumulated horizontal scroll.
    pub scroll_left: f32,
}

impl FakeNavStrip {
    /// Strip of the given width with no entries.
    pub fn new(width: f32) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }

    /// Place the entry for `key` at `[left, right]`.
    pub fn place(&mut self, key: SectionKey, left: f32, right: f32) {
        self.bounds.insert(key, Bounds { left, right });
    }

    /// Whether the entry for `key` carries the visible styling.
    pub fn is_marked_visible(&self, key: &SectionKey) -> bool {
        self.visible.contains(key)
    }
}

impl NavStrip for FakeNavStrip {
    fn width(&self) -> f32 {
        self.width
    }

    fn entry_bounds(&self, key: &SectionKey) -> Option<Bounds> {
        self.bounds.get(key).copied()
    }

    fn set_entry_visible(&mut self, key: &SectionKey, visible: bool) {
        if visible {
            self.visible.insert(key.clone());
        } else {
            self.visible.remove(key);
        }
    }

    fn scroll_entry_into_view(&mut self, key: &SectionKey, align: ScrollAlign) {
        self.scrolls.push((key.clone(), align));
    }

    fn scroll_by(&mut self, dx: f32) {
        self.scroll_left += dx;
    }
}

impl NavStrip for Rc<RefCell<FakeNavStrip>> {
    fn width(&self) -> f32 {
        self.borrow().width()
    }

    fn entry_bounds(&self, key: &SectionKey) -> Option<Bounds> {
        self.borrow().entry_bounds(key)
    }

    fn set_entry_visible(&mut self, key: &SectionKey, visible: bool) {
        self.borrow_mut().set_entry_visible(key, visible);
    }

    fn scroll_entry_into_view(&mut self, key: &SectionKey, align: ScrollAlign) {
        self.borrow_mut().scroll_entry_into_view(key, align);
    }

    fn scroll_by(&mut self, dx: f32) {
        self.borrow_mut().scroll_by(dx);
    }
}

/// Renderer that records every container it was asked to fill.
#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    loaded: Rc<RefCell<Vec<(ElementId, PlaybackOptions)>>>,
    failing: bool,
}

impl RecordingRenderer {
    /// Renderer that rejects every animation.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Containers loaded so far, in order.
    pub fn loaded(&self) -> Vec<ElementId> {
        self.loaded.borrow().iter().map(|(el, _)| *el).collect()
    }

    /// Playback options of the last load.
    pub fn last_options(&self) -> Option<PlaybackOptions> {
        self.loaded.borrow().last().map(|(_, o)| *o)
    }
}

impl AnimationRenderer for RecordingRenderer {
    fn load_animation(
        &mut self,
        container: ElementId,
        _data: &AnimationData,
        options: &PlaybackOptions,
    ) -> Result<(), AnimationError> {
        if self.failing {
            return Err(AnimationError::Render("canvas unavailable".into()));
        }
        self.loaded.borrow_mut().push((container, *options));
        Ok(())
    }
}

/// Sink that records sent items; clones share the record.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    sent: Rc<RefCell<Vec<Item>>>,
}

impl RecordingSink {
    /// Ids sent so far, in order.
    pub fn sent_ids(&self) -> Vec<String> {
        self.sent.borrow().iter().map(|i| i.id.clone()).collect()
    }
}

impl StickerSink for RecordingSink {
    fn send_sticker(&mut self, item: &Item) {
        self.sent.borrow_mut().push(item.clone());
    }
}

/// Unbounded recency store; clones share the list.
#[derive(Clone, Debug, Default)]
pub struct MemoryRecency {
    ids: Rc<RefCell<Vec<String>>>,
}

impl RecencyStore for MemoryRecency {
    fn ids(&self) -> Vec<String> {
        self.ids.borrow().clone()
    }

    fn add(&mut self, id: &str) {
        let mut ids = self.ids.borrow_mut();
        ids.retain(|existing| existing != id);
        ids.insert(0, id.to_string());
    }
}
