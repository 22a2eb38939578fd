use super::App;
use crate::app::workers::{AnimationReady, LoadOutcome, LoaderEvent};
use crate::logic::{ScrollAlign, SectionKey, SectionNavSync, SectionVisibility};
use crate::state::LoadPhase;
use crate::viewport::{PlaybackOptions, VisibilityEntry};

impl App {
    /// What: Apply one loader event.
    ///
    /// Details:
    /// - Events from any generation but the current one are dropped, so a
    ///   superseded sequence can never touch the state of a reload.
    /// - Packs are appended and indexed as they arrive; the recent pool is
    ///   re-resolved once the sequence ends, whatever the outcome.
    pub(super) fn apply_loader_event(&mut self, event: LoaderEvent) {
        if event.generation() != self.generation {
            tracing::debug!(
                stale = event.generation(),
                current = self.generation,
                "[App] Dropping event from superseded load"
            );
            return;
        }
        match event {
            LoaderEvent::ManifestReady {
                integration,
                declared,
                ..
            } => {
                tracing::debug!(declared, "[App] Manifest ready");
                self.integration = integration;
            }
            LoaderEvent::PackLoaded { pack, .. } => {
                self.index.merge_many(pack.items.iter().cloned());
                self.load.packs.push(pack);
                if self.filter.is_active() {
                    self.recompute_filter();
                }
                self.dirty = true;
            }
            LoaderEvent::Finished { outcome, .. } => {
                self.loader = None;
                self.load.phase = match outcome {
                    LoadOutcome::Complete | LoadOutcome::NotFound => LoadPhase::Loaded,
                    LoadOutcome::Failed(e) => LoadPhase::Errored(e.to_string()),
                };
                self.refresh_recent();
            }
        }
    }

    /// What: Settle a load sequence whose task ended without a `Finished` event.
    ///
    /// Details:
    /// - Only reachable when the task panicked; the phase becomes an error so
    ///   waiting callers return.
    pub(super) fn apply_loader_exit(&mut self) {
        self.loader = None;
        while let Ok(ev) = self.loader_rx.try_recv() {
            self.apply_loader_event(ev);
        }
        if self.load.phase.is_terminal() {
            return;
        }
        tracing::error!(generation = self.generation, "[App] Pack loader stopped unexpectedly");
        self.load.phase = LoadPhase::Errored("Pack loader stopped unexpectedly".into());
        self.refresh_recent();
    }

    /// What: Hand a finished animation pipeline to the renderer.
    ///
    /// Details:
    /// - Results for elements that were unmounted meanwhile are discarded.
    /// - A failure only affects its own element, which stays empty.
    pub(super) fn apply_animation_ready(&mut self, ready: AnimationReady) {
        let AnimationReady {
            element,
            url,
            result,
        } = ready;
        self.animations_in_flight = self.animations_in_flight.saturating_sub(1);
        if !self.animations.is_tracked(element) || !self.registry.is_mounted(element) {
            tracing::debug!(element = element.raw(), "[App] Discarding animation for removed element");
            return;
        }
        let played = result.and_then(|data| {
            self.renderer
                .load_animation(element, &data, &PlaybackOptions::default())
        });
        match played {
            Ok(()) => self.animations.complete(element, true),
            Err(e) => {
                tracing::error!(url = %url, error = %e, "[Animation] Failed to load animation");
                self.animations.complete(element, false);
            }
        }
    }

    /// Apply a thumbnail visibility batch.
    pub fn on_image_visibility(&mut self, entries: &[VisibilityEntry]) {
        self.images.handle(entries);
    }

    /// What: Apply an animated tile visibility batch.
    ///
    /// Details:
    /// - Each element starts its pipeline the first time it becomes visible and
    ///   never again.
    pub fn on_animation_visibility(&mut self, entries: &[VisibilityEntry]) {
        for job in self.animations.handle(entries) {
            self.spawn_animation(job);
        }
    }

    /// What: Apply a section visibility batch to the nav strip.
    ///
    /// Output:
    /// - The nav entry scrolled into view, if any.
    pub fn on_section_visibility(
        &mut self,
        entries: &[VisibilityEntry],
    ) -> Option<(SectionKey, ScrollAlign)> {
        let batch: Vec<SectionVisibility> = entries
            .iter()
            .map(|entry| SectionVisibility {
                section: self.section_elements.get(&entry.element).cloned(),
                visible: entry.visible,
            })
            .collect();
        self.nav_sync.handle_batch(self.nav.as_mut(), &batch)
    }

    /// Scroll the nav strip horizontally for vertical wheel input.
    pub fn nav_wheel(&mut self, delta_y: f32) {
        SectionNavSync::wheel(self.nav.as_mut(), delta_y);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::app::persist::{KEY_RECENT_CACHE, KEY_STICKERS_PER_ROW, KEY_THEME_OVERRIDE};
    use crate::app::{AppConfig, ClientStore, Collaborators, MemoryStore};
    use crate::index::encode_snapshot;
    use crate::logic::RecencyStore;
    use crate::sources::CacheMode;
    use crate::state::Pack;
    use crate::test_utils::{
        FakeFetcher, FakeNavStrip, FakeVisibility, MemoryRecency, RecordingRenderer,
        RecordingSink, gzip, item,
    };
    use crate::theme::{Theme, ThemeChoice};
    use crate::ui::{Content, NavIcon, Screen, TileKind};
    use crate::viewport::{AnimationStatus, ElementId, GzipDecompressor};

    const MANIFEST: &str = "packs/index.json";
    const LOTTIE: &[u8] = br#"{"v":"5.5.2","fr":30,"ip":0,"op":60,"w":512,"h":512,"layers":[]}"#;

    /// Store whose contents stay inspectable after the app takes ownership.
    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryStore>>);

    impl ClientStore for SharedStore {
        fn get(&self, key: &str) -> Option<String> {
            self.0.borrow().get(key)
        }

        fn set(&mut self, key: &str, value: &str) {
            self.0.borrow_mut().set(key, value);
        }

        fn remove(&mut self, key: &str) {
            self.0.borrow_mut().remove(key);
        }
    }

    struct Harness {
        fetcher: FakeFetcher,
        images: FakeVisibility,
        animations: FakeVisibility,
        sections: FakeVisibility,
        nav: Rc<RefCell<FakeNavStrip>>,
        renderer: RecordingRenderer,
        sink: RecordingSink,
        recency: MemoryRecency,
        store: SharedStore,
    }

    impl Harness {
        fn new(fetcher: FakeFetcher) -> Self {
            Self {
                fetcher,
                images: FakeVisibility::default(),
                animations: FakeVisibility::default(),
                sections: FakeVisibility::default(),
                nav: Rc::new(RefCell::new(FakeNavStrip::new(100.0))),
                renderer: RecordingRenderer::default(),
                sink: RecordingSink::default(),
                recency: MemoryRecency::default(),
                store: SharedStore::default(),
            }
        }

        fn app(&self) -> App {
            self.app_with(AppConfig::default())
        }

        fn app_with(&self, config: AppConfig) -> App {
            App::new(
                config,
                Collaborators {
                    fetcher: Arc::new(self.fetcher.clone()),
                    decompressor: Arc::new(GzipDecompressor),
                    renderer: Box::new(self.renderer.clone()),
                    sink: Box::new(self.sink.clone()),
                    recency: Box::new(self.recency.clone()),
                    store: Box::new(self.store.clone()),
                    image_source: Box::new(self.images.clone()),
                    animation_source: Box::new(self.animations.clone()),
                    section_source: Box::new(self.sections.clone()),
                    nav: Box::new(Rc::clone(&self.nav)),
                },
            )
        }
    }

    fn two_packs() -> FakeFetcher {
        FakeFetcher::new()
            .json(MANIFEST, r#"{"packs":["a.json","b.json"]}"#)
            .json(
                "packs/a.json",
                r#"{"id":"a","title":"Pack A","stickers":[
                    {"id":"a1","url":"mxc://x/a1.png","body":"Smile"},
                    {"id":"a2","url":"mxc://x/a2.tgs","body":"Wave"}]}"#,
            )
            .json(
                "packs/b.json",
                r#"{"id":"b","title":"Pack B","stickers":[
                    {"id":"b1","url":"mxc://x/b1.webp","body":"Heart"}]}"#,
            )
            .bytes("mxc://x/a2.tgs", gzip(LOTTIE))
    }

    fn animated_cover() -> FakeFetcher {
        FakeFetcher::new()
            .json(MANIFEST, r#"{"packs":["anim.json"]}"#)
            .json(
                "packs/anim.json",
                r#"{"id":"anim","title":"Animated","stickers":[{"id":"t1","url":"mxc://x/t1.tgs","body":"Dance"}]}"#,
            )
            .bytes("mxc://x/t1.tgs", gzip(LOTTIE))
    }

    fn nav_animation(app: &App) -> ElementId {
        content(app)
            .nav
            .iter()
            .find_map(|entry| match &entry.icon {
                NavIcon::Animation { element, .. } => Some(*element),
                _ => None,
            })
            .expect("animated nav icon")
    }

    fn content(app: &App) -> &Content {
        match &app.frame().screen {
            Screen::Content(content) => content,
            other => panic!("expected content, got {other:?}"),
        }
    }

    fn tile_for(app: &App, section: &SectionKey, id: &str) -> ElementId {
        content(app)
            .section(section)
            .and_then(|s| s.tiles.iter().find(|t| t.item.id == id))
            .map(|t| t.element)
            .expect("tile rendered")
    }

    async fn loaded(harness: &Harness) -> App {
        let mut app = harness.app();
        app.start();
        app.wait_for_load().await;
        app
    }

    #[tokio::test]
    /// What: A full load renders recent, every pack in order, then settings.
    async fn initial_load_renders_packs_in_order() {
        let harness = Harness::new(two_packs());
        let app = loaded(&harness).await;

        assert_eq!(app.load_state().phase, LoadPhase::Loaded);
        assert_eq!(
            content(&app).section_order(),
            vec![
                SectionKey::Recent,
                SectionKey::Pack("a".into()),
                SectionKey::Pack("b".into()),
                SectionKey::Settings,
            ]
        );
        assert!(app.index().get("b1").is_some());
        assert_eq!(harness.fetcher.last_cache_mode(MANIFEST), Some(CacheMode::Default));
        assert_eq!(harness.sections.observed_count(), 4);
        assert_eq!(harness.images.observed_count(), 2);
        assert_eq!(harness.animations.observed_count(), 1);
        assert_eq!(harness.fetcher.calls("mxc://x/a2.tgs"), 0);
    }

    #[tokio::test]
    /// What: A missing manifest ends in the empty screen; a server error shows its status text.
    async fn manifest_failures_pick_the_right_screen() {
        let harness = Harness::new(FakeFetcher::new());
        let app = loaded(&harness).await;
        assert_eq!(app.frame().screen, Screen::Empty);

        let harness = Harness::new(FakeFetcher::new().status(MANIFEST, 500, "Internal Server Error"));
        let app = loaded(&harness).await;
        assert_eq!(
            app.frame().screen,
            Screen::Error {
                message: "Internal Server Error".into()
            }
        );
    }

    #[tokio::test]
    /// What: A reload bypasses caches and ignores events tagged with the old generation.
    async fn reload_drops_stale_events() {
        let harness = Harness::new(two_packs());
        let mut app = loaded(&harness).await;
        assert_eq!(app.generation(), 1);

        app.reload();
        assert_eq!(app.generation(), 2);
        assert_eq!(app.frame().screen, Screen::Loading);
        app.apply_loader_event(LoaderEvent::PackLoaded {
            generation: 1,
            pack: Pack {
                id: "stale".into(),
                title: "Stale".into(),
                items: vec![item("zz", "mxc://x/zz.png")],
            },
        });
        assert!(app.load_state().packs.is_empty());
        assert!(app.index().get("zz").is_none());

        app.wait_for_load().await;
        let ids: Vec<&str> = app.load_state().packs.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(harness.fetcher.last_cache_mode(MANIFEST), Some(CacheMode::NoCache));
    }

    #[tokio::test]
    /// What: A reload issued while a pack is still loading yields every pack exactly once.
    ///
    /// Inputs:
    /// - `b.json` answers after a delay; reload right after `a` arrives.
    ///
    /// Output:
    /// - Packs `[a, b]` after the reload, with no leftovers from the aborted sequence.
    async fn reload_mid_load_keeps_packs_unique() {
        let harness = Harness::new(two_packs().delay("packs/b.json", Duration::from_millis(40)));
        let mut app = harness.app();
        app.start();
        while app.load_state().packs.is_empty() {
            assert!(app.next_event().await);
        }
        assert_eq!(app.load_state().phase, LoadPhase::Loading);

        app.reload();
        app.wait_for_load().await;
        let ids: Vec<&str> = app.load_state().packs.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(harness.fetcher.calls("packs/a.json"), 2);
        assert_eq!(content(&app).section_order().len(), 4);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(!app.next_event().await);
        assert_eq!(app.load_state().packs.len(), 2);
    }

    #[tokio::test]
    /// What: A loader task that dies without reporting its end settles into an error.
    async fn crashed_loader_ends_in_error() {
        let harness = Harness::new(FakeFetcher::new().panic(MANIFEST));
        let mut app = loaded(&harness).await;
        assert!(matches!(app.load_state().phase, LoadPhase::Errored(_)));
        assert!(matches!(app.frame().screen, Screen::Error { .. }));
        assert!(!app.next_event().await);
    }

    #[tokio::test]
    /// What: Thumbnails load on enter and unload on leave.
    async fn image_tiles_follow_visibility() {
        let harness = Harness::new(two_packs());
        let mut app = loaded(&harness).await;
        let a1 = tile_for(&app, &SectionKey::Pack("a".into()), "a1");

        assert_eq!(app.image(a1).and_then(|t| t.src.clone()), None);
        app.on_image_visibility(&[VisibilityEntry::enter(a1)]);
        assert_eq!(
            app.image(a1).and_then(|t| t.src.clone()).as_deref(),
            Some("packs/thumbnails/a1.png")
        );
        app.on_image_visibility(&[VisibilityEntry::leave(a1)]);
        assert_eq!(app.image(a1).and_then(|t| t.src.clone()), None);
    }

    #[tokio::test]
    /// What: An animated tile fetches and plays exactly once however often it is reported.
    async fn animation_starts_once() {
        let harness = Harness::new(two_packs());
        let mut app = loaded(&harness).await;
        let a2 = tile_for(&app, &SectionKey::Pack("a".into()), "a2");
        assert_eq!(app.animation_status(a2), Some(AnimationStatus::Waiting));

        app.on_animation_visibility(&[VisibilityEntry::enter(a2), VisibilityEntry::enter(a2)]);
        assert!(app.next_event().await);
        app.on_animation_visibility(&[VisibilityEntry::leave(a2), VisibilityEntry::enter(a2)]);

        assert_eq!(harness.fetcher.calls("mxc://x/a2.tgs"), 1);
        assert_eq!(harness.renderer.loaded(), vec![a2]);
        assert_eq!(harness.renderer.last_options(), Some(PlaybackOptions::default()));
        assert_eq!(app.animation_status(a2), Some(AnimationStatus::Playing));
        assert!(!harness.animations.is_observed(a2));
    }

    #[tokio::test]
    /// What: A failed animation leaves its element empty and the rest of the list intact.
    async fn animation_failure_is_isolated() {
        let fetcher = two_packs().status("mxc://x/a2.tgs", 500, "Internal Server Error");
        let harness = Harness::new(fetcher);
        let mut app = loaded(&harness).await;
        let a2 = tile_for(&app, &SectionKey::Pack("a".into()), "a2");

        app.on_animation_visibility(&[VisibilityEntry::enter(a2)]);
        assert!(app.next_event().await);

        assert_eq!(app.animation_status(a2), Some(AnimationStatus::Failed));
        assert!(harness.renderer.loaded().is_empty());
        assert_eq!(content(&app).sections.len(), 4);
    }

    #[tokio::test]
    /// What: A renderer rejecting an animation fails only that tile.
    ///
    /// Inputs:
    /// - Failing renderer; animated tile `a2` enters the viewport.
    ///
    /// Output:
    /// - `a2` is `Failed`; thumbnail tile `a1` still loads and the list keeps every section.
    async fn render_failure_is_isolated() {
        let mut harness = Harness::new(two_packs());
        harness.renderer = RecordingRenderer::failing();
        let mut app = loaded(&harness).await;
        let a1 = tile_for(&app, &SectionKey::Pack("a".into()), "a1");
        let a2 = tile_for(&app, &SectionKey::Pack("a".into()), "a2");

        app.on_animation_visibility(&[VisibilityEntry::enter(a2)]);
        assert!(app.next_event().await);
        assert_eq!(harness.fetcher.calls("mxc://x/a2.tgs"), 1);
        assert_eq!(app.animation_status(a2), Some(AnimationStatus::Failed));
        assert!(harness.renderer.loaded().is_empty());

        app.on_image_visibility(&[VisibilityEntry::enter(a1)]);
        assert!(app.image(a1).and_then(|t| t.src.clone()).is_some());
        assert_eq!(content(&app).sections.len(), 4);
        assert!(!app.next_event().await);
    }

    #[tokio::test]
    /// What: An animated pack cover starts in the nav strip without waiting for visibility.
    async fn animated_nav_icon_starts_eagerly() {
        let harness = Harness::new(animated_cover());
        let mut app = loaded(&harness).await;

        let icon = nav_animation(&app);
        while app.animation_status(icon) == Some(AnimationStatus::Loading) {
            assert!(app.next_event().await);
        }
        assert_eq!(app.animation_status(icon), Some(AnimationStatus::Playing));
        assert_eq!(harness.fetcher.calls("mxc://x/t1.tgs"), 1);

        let tile = tile_for(&app, &SectionKey::Pack("anim".into()), "t1");
        assert_eq!(app.animation_status(tile), Some(AnimationStatus::Waiting));
    }

    #[tokio::test]
    /// What: Sending records the use, persists the snapshot, and reaches the host.
    async fn send_records_recent_and_notifies_host() {
        let harness = Harness::new(two_packs());
        let mut app = loaded(&harness).await;

        let sent = app.send("b1").expect("known sticker");
        assert_eq!(sent.body, "Heart");
        assert_eq!(harness.sink.sent_ids(), vec!["b1".to_string()]);
        assert_eq!(harness.recency.ids(), vec!["b1".to_string()]);

        let recent: Vec<&str> = app.recent().items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(recent, vec!["b1"]);
        let snapshot = harness.store.get(KEY_RECENT_CACHE).expect("snapshot stored");
        assert!(snapshot.contains("b1"));
        let recent_section = content(&app).section(&SectionKey::Recent).expect("recent");
        assert_eq!(recent_section.tiles.len(), 1);

        assert!(app.send("missing").is_none());
        assert_eq!(harness.sink.sent_ids().len(), 1);
    }

    #[tokio::test]
    /// What: A stored snapshot shows recent stickers before packs load; a broken one is dropped.
    async fn snapshot_seeds_recent_pool() {
        let harness = Harness::new(two_packs());
        harness.recency.clone().add("a1");
        harness
            .store
            .clone()
            .set(KEY_RECENT_CACHE, &encode_snapshot(&[item("a1", "mxc://x/a1.png")]));
        let app = harness.app();
        assert_eq!(app.recent().items.len(), 1);
        assert_eq!(app.recent().items[0].id, "a1");

        let harness = Harness::new(two_packs());
        harness.store.clone().set(KEY_RECENT_CACHE, "{not json");
        let app = harness.app();
        assert!(app.recent().items.is_empty());
        assert!(harness.store.get(KEY_RECENT_CACHE).is_none());
    }

    #[tokio::test]
    /// What: Row size and theme choices are clamped, persisted and restored.
    async fn preferences_persist() {
        let harness = Harness::new(two_packs());
        let mut app = harness.app();

        app.set_stickers_per_row(99);
        assert_eq!(app.stickers_per_row(), 10);
        assert_eq!(harness.store.get(KEY_STICKERS_PER_ROW).as_deref(), Some("10"));

        app.set_theme(ThemeChoice::Explicit(Theme::Dark));
        assert_eq!(app.frame().theme, Theme::Dark);
        assert_eq!(harness.store.get(KEY_THEME_OVERRIDE).as_deref(), Some("dark"));

        let restored = harness.app();
        assert_eq!(restored.theme(), Theme::Dark);
        assert_eq!(restored.stickers_per_row(), 10);

        app.set_theme(ThemeChoice::Default);
        assert_eq!(app.theme(), Theme::Light);
        assert!(harness.store.get(KEY_THEME_OVERRIDE).is_none());
    }

    #[tokio::test]
    /// What: Search narrows the list, reports no matches, and clears on blank input.
    async fn search_filters_sections() {
        let harness = Harness::new(two_packs());
        let mut app = loaded(&harness).await;

        app.search("  SMILE ");
        assert_eq!(app.filter().term, "smile");
        let view = content(&app);
        assert_eq!(
            view.section_order(),
            vec![SectionKey::Pack("a".into()), SectionKey::Settings]
        );
        assert_eq!(view.sections[0].tiles.len(), 1);
        assert!(!view.search_empty);

        app.search("zzz");
        assert!(content(&app).search_empty);
        assert_eq!(content(&app).section_order(), vec![SectionKey::Settings]);

        app.search("   ");
        assert!(!app.filter().is_active());
        assert_eq!(content(&app).sections.len(), 4);
    }

    #[tokio::test]
    /// What: Section visibility marks nav entries and scrolls hidden ones into view.
    async fn section_visibility_drives_nav_strip() {
        let harness = Harness::new(two_packs());
        let mut app = loaded(&harness).await;
        let pack_b = SectionKey::Pack("b".into());
        harness.nav.borrow_mut().place(pack_b.clone(), 120.0, 160.0);
        let el = content(&app).section(&pack_b).expect("section").element;

        let scrolled = app.on_section_visibility(&[VisibilityEntry::enter(el)]);
        assert_eq!(scrolled, Some((pack_b.clone(), ScrollAlign::End)));
        assert!(harness.nav.borrow().is_marked_visible(&pack_b));
        assert!(app.is_section_visible(&pack_b));

        app.on_section_visibility(&[VisibilityEntry::leave(el)]);
        assert!(!app.is_section_visible(&pack_b));

        app.nav_wheel(30.0);
        assert!((harness.nav.borrow().scroll_left - 30.0).abs() < f32::EPSILON);
    }

    #[tokio::test]
    /// What: State changes after teardown neither re-observe nor restart anything.
    ///
    /// Inputs:
    /// - Pack with an animated cover, played once, then teardown and a theme change.
    ///
    /// Output:
    /// - No new fetch, no new observe call, and the icon is no longer tracked.
    async fn teardown_stops_rendering() {
        let harness = Harness::new(animated_cover());
        let mut app = loaded(&harness).await;
        let icon = nav_animation(&app);
        while app.animation_status(icon) == Some(AnimationStatus::Loading) {
            assert!(app.next_event().await);
        }
        assert_eq!(app.animation_status(icon), Some(AnimationStatus::Playing));
        let observed = [&harness.images, &harness.animations, &harness.sections]
            .map(|source| source.observe_calls().len());

        app.teardown();
        app.set_theme(ThemeChoice::Explicit(Theme::Dark));
        app.search("dance");
        app.reload();

        assert_eq!(harness.fetcher.calls("mxc://x/t1.tgs"), 1);
        assert_eq!(harness.fetcher.calls(MANIFEST), 1);
        assert_eq!(
            [&harness.images, &harness.animations, &harness.sections]
                .map(|source| source.observe_calls().len()),
            observed
        );
        assert_eq!(app.animation_status(icon), None);
        assert!(!app.next_event().await);
    }

    #[tokio::test]
    /// What: The configured thumbnail margin is reported to hosts.
    async fn image_margin_is_exposed() {
        let harness = Harness::new(two_packs());
        assert_eq!(harness.app().image_observer_options().root_margin_px, 100);

        let app = harness.app_with(AppConfig {
            image_root_margin_px: 250,
            ..AppConfig::default()
        });
        assert_eq!(app.image_observer_options().root_margin_px, 250);
    }

    #[tokio::test]
    /// What: Teardown releases every watch.
    async fn teardown_disconnects_everything() {
        let harness = Harness::new(two_packs());
        let mut app = loaded(&harness).await;
        app.teardown();

        for source in [&harness.images, &harness.animations, &harness.sections] {
            assert_eq!(source.observed_count(), 0);
            assert!(source.disconnects() >= 1);
        }
    }
}
