use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::persist::{ClientStore, KEY_RECENT_CACHE, KEY_STICKERS_PER_ROW, KEY_THEME_OVERRIDE};
use super::workers::{AnimationReady, LoadRequest, LoaderEvent, spawn_animation_job, spawn_pack_loader};
use crate::index::{ItemIndex, decode_snapshot};
use crate::logic::{
    NavStrip, RecencyResolver, RecencyStore, SectionKey, SectionNavSync, filter_pools, sanitize,
};
use crate::sources::{CacheMode, Fetcher, PackPaths};
use crate::state::{FilterState, IntegrationConfig, Item, ItemRef, LoadState, Pack};
use crate::theme::{
    DEFAULT_STICKERS_PER_ROW, Settings, Theme, ThemeChoice, clamp_stickers_per_row,
    parse_stickers_per_row, resolve_theme,
};
use crate::ui::{Frame, NavIcon, Screen, TileKind, ViewInput, build_frame};
use crate::viewport::{
    AnimationJob, AnimationLoader, AnimationRenderer, AnimationStatus, Decompressor, ElementId,
    ElementRegistry, ImageObserver, ObservedSet, ObserverOptions, TileImage, VisibilitySource,
};

/// Event handlers applied by the orchestrator.
mod handlers;

/// Host transport that delivers a chosen item.
pub trait StickerSink {
    /// Deliver `item` to the embedding host.
    fn send_sticker(&mut self, item: &Item);
}

/// Static configuration of a picker session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// Manifest and pack location rules.
    pub paths: PackPaths,
    /// Session default theme.
    pub default_theme: Theme,
    /// Margin at which thumbnails start loading.
    pub image_root_margin_px: u32,
}

impl AppConfig {
    /// What: Derive a session configuration from settings.
    ///
    /// Inputs:
    /// - `settings`: Loaded settings.
    /// - `manifest_override`: Manifest location that beats the configured one.
    #[must_use]
    pub fn from_settings(settings: &Settings, manifest_override: Option<&str>) -> Self {
        let manifest = manifest_override.or(settings.manifest_url.as_deref());
        Self {
            paths: PackPaths::new(&settings.packs_base_url, manifest),
            default_theme: settings.default_theme,
            image_root_margin_px: settings.image_root_margin_px,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default(), None)
    }
}

/// Host capabilities the orchestrator drives.
pub struct Collaborators {
    /// Network/filesystem access.
    pub fetcher: Arc<dyn Fetcher>,
    /// Animation payload decompression.
    pub decompressor: Arc<dyn Decompressor>,
    /// Animation playback.
    pub renderer: Box<dyn AnimationRenderer>,
    /// Item delivery.
    pub sink: Box<dyn StickerSink>,
    /// Recently used ranking.
    pub recency: Box<dyn RecencyStore>,
    /// Client preferences and caches.
    pub store: Box<dyn ClientStore>,
    /// Watches tiles with thumbnails (created with the image margin).
    pub image_source: Box<dyn VisibilitySource>,
    /// Watches animated tiles.
    pub animation_source: Box<dyn VisibilitySource>,
    /// Watches list sections.
    pub section_source: Box<dyn VisibilitySource>,
    /// Horizontal nav strip.
    pub nav: Box<dyn NavStrip>,
}

/// The picker orchestrator.
///
/// All state lives here and is only touched from the task that owns the
/// `App`. Workers report through channels; [`App::next_event`] applies their
/// results and re-renders once per drained batch.
pub struct App {
    /// Session configuration.
    config: AppConfig,
    /// Fetch capability shared with workers.
    fetcher: Arc<dyn Fetcher>,
    /// Decompression capability shared with workers.
    decompressor: Arc<dyn Decompressor>,
    /// Animation playback.
    renderer: Box<dyn AnimationRenderer>,
    /// Item delivery.
    sink: Box<dyn StickerSink>,
    /// Recently used ranking.
    recency: Box<dyn RecencyStore>,
    /// Client preferences.
    store: Box<dyn ClientStore>,
    /// Horizontal nav strip.
    nav: Box<dyn NavStrip>,

    /// Id to item lookup for the whole session.
    index: ItemIndex,
    /// Loaded packs and load phase.
    load: LoadState,
    /// Search term and filtered pools.
    filter: FilterState,
    /// Resolved recent pool.
    recent: RecencyResolver,
    /// Active theme.
    theme: Theme,
    /// Grid width.
    stickers_per_row: u8,
    /// Integration credentials from the last manifest.
    integration: Option<IntegrationConfig>,

    /// Generation of the current load sequence.
    generation: u64,
    /// Running load sequence, aborted on reload.
    loader: Option<JoinHandle<()>>,
    /// Loader events (sender cloned into each sequence).
    loader_tx: mpsc::UnboundedSender<LoaderEvent>,
    loader_rx: mpsc::UnboundedReceiver<LoaderEvent>,
    /// Animation pipeline results.
    anim_tx: mpsc::UnboundedSender<AnimationReady>,
    anim_rx: mpsc::UnboundedReceiver<AnimationReady>,
    /// Animation pipelines spawned but not yet reported.
    animations_in_flight: usize,

    /// Element identities.
    registry: ElementRegistry,
    /// Thumbnail toggling.
    images: ImageObserver,
    /// One-shot animation starts.
    animations: AnimationLoader,
    /// Section watches.
    sections: ObservedSet,
    /// Section of every watched section element.
    section_elements: HashMap<ElementId, SectionKey>,
    /// Nav strip follower.
    nav_sync: SectionNavSync,

    /// Last render.
    frame: Frame,
    /// Whether state changed since the last render.
    dirty: bool,
    /// Set by [`App::teardown`]; no further renders or loads happen.
    torn_down: bool,
}

impl App {
    /// What: Create a picker session.
    ///
    /// Inputs:
    /// - `config`: Session configuration.
    /// - `collab`: Host capabilities.
    ///
    /// Details:
    /// - Restores row size, theme override and the recent stickers snapshot from
    ///   the client store. The snapshot seeds the item index so recent stickers
    ///   render before any pack loads; a malformed snapshot is discarded.
    #[must_use]
    pub fn new(config: AppConfig, collab: Collaborators) -> Self {
        let Collaborators {
            fetcher,
            decompressor,
            renderer,
            sink,
            recency,
            mut store,
            image_source,
            animation_source,
            section_source,
            nav,
        } = collab;

        let theme = resolve_theme(
            store.get(KEY_THEME_OVERRIDE).as_deref(),
            config.default_theme,
        );
        let stickers_per_row = store
            .get(KEY_STICKERS_PER_ROW)
            .map_or(DEFAULT_STICKERS_PER_ROW, |raw| parse_stickers_per_row(&raw));

        let mut index = ItemIndex::new();
        if let Some(raw) = store.get(KEY_RECENT_CACHE) {
            match decode_snapshot(&raw) {
                Some(items) => {
                    tracing::debug!(count = items.len(), "[App] Seeded index from recent snapshot");
                    index.merge_many(items);
                }
                None => store.remove(KEY_RECENT_CACHE),
            }
        }
        let mut recent = RecencyResolver::new();
        recent.refresh(recency.as_ref(), &index);

        let images = ImageObserver::new(
            image_source,
            ObserverOptions {
                root_margin_px: config.image_root_margin_px,
            },
        );
        let (loader_tx, loader_rx) = mpsc::unbounded_channel();
        let (anim_tx, anim_rx) = mpsc::unbounded_channel();

        let mut app = Self {
            frame: Frame {
                theme,
                stickers_per_row,
                screen: Screen::Loading,
            },
            config,
            fetcher,
            decompressor,
            renderer,
            sink,
            recency,
            store,
            nav,
            index,
            load: LoadState::default(),
            filter: FilterState::default(),
            recent,
            theme,
            stickers_per_row,
            integration: None,
            generation: 0,
            loader: None,
            loader_tx,
            loader_rx,
            anim_tx,
            anim_rx,
            animations_in_flight: 0,
            registry: ElementRegistry::new(),
            images,
            animations: AnimationLoader::new(animation_source),
            sections: ObservedSet::new(section_source),
            section_elements: HashMap::new(),
            nav_sync: SectionNavSync::new(),
            dirty: true,
            torn_down: false,
        };
        app.commit();
        app
    }

    /// Start the initial load.
    pub fn start(&mut self) {
        if self.torn_down {
            return;
        }
        self.begin_load(CacheMode::Default);
        self.commit();
    }

    /// What: Reload every pack, bypassing caches.
    ///
    /// Details:
    /// - Clears packs and search, drops every element watch, and starts a new
    ///   generation; events still arriving from the previous sequence are ignored.
    pub fn reload(&mut self) {
        if self.torn_down {
            return;
        }
        tracing::info!(generation = self.generation + 1, "[App] Reloading packs");
        self.detach_all();
        self.filter.clear();
        self.begin_load(CacheMode::NoCache);
        self.commit();
    }

    /// What: Apply a search input.
    ///
    /// Details:
    /// - The input is trimmed and lowercased; an empty result clears the filter so
    ///   the unfiltered pools are shown as they are.
    pub fn search(&mut self, input: &str) {
        let term = sanitize(input);
        if term.is_empty() {
            self.filter.clear();
        } else {
            self.filter.term = term;
            self.recompute_filter();
        }
        self.dirty = true;
        self.commit();
    }

    /// What: Send an item to the host and record its use.
    ///
    /// Output:
    /// - The item sent, or `None` when the id is unknown.
    pub fn send(&mut self, item_id: &str) -> Option<ItemRef> {
        let Some(item) = self.index.get(item_id) else {
            tracing::warn!(id = item_id, "[App] Ignoring send of unknown sticker");
            return None;
        };
        self.recency.add(item_id);
        self.refresh_recent();
        self.commit();
        tracing::info!(id = item_id, "[App] Sending sticker");
        self.sink.send_sticker(&item);
        Some(item)
    }

    /// Set and persist the grid width, clamped into the supported range.
    pub fn set_stickers_per_row(&mut self, value: i64) {
        let clamped = clamp_stickers_per_row(value);
        self.store
            .set(KEY_STICKERS_PER_ROW, &clamped.to_string());
        self.stickers_per_row = clamped;
        self.dirty = true;
        self.commit();
    }

    /// What: Apply a theme choice.
    ///
    /// Details:
    /// - `Default` removes the stored override and returns to the session default.
    pub fn set_theme(&mut self, choice: ThemeChoice) {
        self.theme = match choice {
            ThemeChoice::Default => {
                self.store.remove(KEY_THEME_OVERRIDE);
                self.config.default_theme
            }
            ThemeChoice::Explicit(theme) => {
                self.store.set(KEY_THEME_OVERRIDE, theme.as_str());
                theme
            }
        };
        self.dirty = true;
        self.commit();
    }

    /// What: Wait for the next worker result and apply it with everything else queued.
    ///
    /// Output:
    /// - `false` without waiting when no load is running, no animation pipeline
    ///   is pending and nothing is queued.
    ///
    /// Details:
    /// - All queued events are applied before a single re-render.
    /// - A load sequence that exits without reporting its end (a panicked task)
    ///   moves the load into the error phase.
    pub async fn next_event(&mut self) -> bool {
        enum Incoming {
            Loader(LoaderEvent),
            Animation(AnimationReady),
            LoaderExited,
        }
        if self.loader.is_none()
            && self.animations_in_flight == 0
            && self.loader_rx.is_empty()
            && self.anim_rx.is_empty()
        {
            return false;
        }
        let loader = self.loader.as_mut();
        let exited = async move {
            match loader {
                Some(handle) => {
                    let _ = handle.await;
                }
                None => std::future::pending::<()>().await,
            }
        };
        let incoming = tokio::select! {
            biased;
            Some(ev) = self.loader_rx.recv() => Incoming::Loader(ev),
            Some(ready) = self.anim_rx.recv() => Incoming::Animation(ready),
            () = exited => Incoming::LoaderExited,
        };
        match incoming {
            Incoming::Loader(ev) => self.apply_loader_event(ev),
            Incoming::Animation(ready) => self.apply_animation_ready(ready),
            Incoming::LoaderExited => self.apply_loader_exit(),
        }
        while let Ok(ev) = self.loader_rx.try_recv() {
            self.apply_loader_event(ev);
        }
        while let Ok(ready) = self.anim_rx.try_recv() {
            self.apply_animation_ready(ready);
        }
        self.commit();
        true
    }

    /// Process events until the current load sequence reaches a terminal phase.
    pub async fn wait_for_load(&mut self) {
        while !self.load.phase.is_terminal() && self.loader.is_some() {
            if !self.next_event().await {
                break;
            }
        }
    }

    /// What: Release every element watch and stop the running load.
    ///
    /// Details:
    /// - Every element is unmounted and later state changes no longer render, so
    ///   nothing is observed or started again. `start` and `reload` are ignored.
    pub fn teardown(&mut self) {
        if let Some(handle) = self.loader.take() {
            handle.abort();
        }
        self.detach_all();
        self.torn_down = true;
    }

    /// Image observer configuration for hosts creating the thumbnail source.
    #[must_use]
    pub const fn image_observer_options(&self) -> ObserverOptions {
        self.images.options()
    }

    /// Last render.
    #[must_use]
    pub const fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Load state.
    #[must_use]
    pub const fn load_state(&self) -> &LoadState {
        &self.load
    }

    /// Search state.
    #[must_use]
    pub const fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Resolved recent pool.
    #[must_use]
    pub const fn recent(&self) -> &Pack {
        self.recent.pool()
    }

    /// Session item index.
    #[must_use]
    pub const fn index(&self) -> &ItemIndex {
        &self.index
    }

    /// Active theme.
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Grid width.
    #[must_use]
    pub const fn stickers_per_row(&self) -> u8 {
        self.stickers_per_row
    }

    /// Integration credentials announced by the manifest.
    #[must_use]
    pub const fn integration(&self) -> Option<&IntegrationConfig> {
        self.integration.as_ref()
    }

    /// Generation of the current load sequence.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Thumbnail state of a tile.
    #[must_use]
    pub fn image(&self, element: ElementId) -> Option<&TileImage> {
        self.images.tile(element)
    }

    /// Animation state of an element.
    #[must_use]
    pub fn animation_status(&self, element: ElementId) -> Option<AnimationStatus> {
        self.animations.status(element)
    }

    /// Whether a section is reported visible.
    #[must_use]
    pub fn is_section_visible(&self, key: &SectionKey) -> bool {
        self.nav_sync.is_visible(key)
    }

    /// Abort the previous sequence and spawn a new generation.
    fn begin_load(&mut self, cache: CacheMode) {
        if let Some(handle) = self.loader.take() {
            handle.abort();
        }
        self.generation += 1;
        self.load.restart();
        self.integration = None;
        self.loader = Some(spawn_pack_loader(
            Arc::clone(&self.fetcher),
            self.config.paths.clone(),
            LoadRequest {
                generation: self.generation,
                cache,
            },
            self.loader_tx.clone(),
        ));
        self.dirty = true;
    }

    /// Drop every element and watch, as when the list is torn down.
    fn detach_all(&mut self) {
        self.images.disconnect();
        self.animations.disconnect();
        self.sections.disconnect();
        self.section_elements.clear();
        self.nav_sync.reset();
        self.registry.unmount_all();
    }

    /// Re-resolve the recent pool and persist its snapshot.
    fn refresh_recent(&mut self) {
        self.recent.refresh(self.recency.as_ref(), &self.index);
        self.store.set(KEY_RECENT_CACHE, &self.recent.snapshot());
        if self.filter.is_active() {
            self.recompute_filter();
        }
        self.dirty = true;
    }

    /// Recompute the filtered pools for the current term.
    fn recompute_filter(&mut self) {
        self.filter.packs = filter_pools(
            &self.filter.term,
            std::iter::once(self.recent.pool()).chain(self.load.packs.iter()),
        );
    }

    /// Render if anything changed.
    fn commit(&mut self) {
        if self.dirty && !self.torn_down {
            self.render();
        }
    }

    /// What: Rebuild the frame and reconcile element watches with it.
    ///
    /// Details:
    /// - Elements that left the render are detached from every observer.
    /// - Every tile, section and animated nav icon of the new frame is attached;
    ///   attaching an already watched element is a no-op.
    fn render(&mut self) {
        self.registry.begin();
        let input = ViewInput {
            theme: self.theme,
            stickers_per_row: self.stickers_per_row,
            load: &self.load,
            filter: &self.filter,
            recent: self.recent.pool(),
            paths: &self.config.paths,
        };
        let frame = build_frame(&input, &mut self.registry);
        for gone in self.registry.finish() {
            self.images.detach(gone);
            self.animations.forget(gone);
            if self.section_elements.remove(&gone).is_some() {
                self.sections.unobserve(gone);
            }
        }
        self.attach(&frame);
        self.frame = frame;
        self.dirty = false;
    }

    fn attach(&mut self, frame: &Frame) {
        let Screen::Content(content) = &frame.screen else {
            return;
        };
        let mut eager = Vec::new();
        for entry in &content.nav {
            if let NavIcon::Animation { element, url, .. } = &entry.icon
                && let Some(job) = self.animations.start_now(*element, url)
            {
                eager.push(job);
            }
        }
        for section in &content.sections {
            self.sections.observe(section.element);
            self.section_elements
                .insert(section.element, section.key.clone());
            for tile in &section.tiles {
                match &tile.kind {
                    TileKind::Image { pending_src } => self.images.attach(tile.element, pending_src),
                    TileKind::Animation { url } => self.animations.observe(tile.element, url),
                }
            }
        }
        for job in eager {
            self.spawn_animation(job);
        }
    }

    fn spawn_animation(&mut self, job: AnimationJob) {
        self.animations_in_flight += 1;
        tracing::debug!(element = job.element.raw(), url = %job.url, "[App] Starting animation");
        spawn_animation_job(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.decompressor),
            job,
            self.anim_tx.clone(),
        );
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.loader.take() {
            handle.abort();
        }
    }
}
