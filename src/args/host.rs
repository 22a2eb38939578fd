//! Headless host: drives the picker from the command line.
//!
//! The terminal has no viewport, so visibility sources and the nav strip are
//! inert, animations are decoded but not drawn, and sent stickers are printed
//! as JSON on stdout.

use std::sync::Arc;
use std::time::Duration;

use crate::app::{App, AppConfig, Collaborators, JsonFileStore, LruRecencyStore, StickerSink};
use crate::args::listing::{render_listing, render_pool};
use crate::args::{Args, packs};
use crate::logic::{Bounds, NavStrip, ScrollAlign, SectionKey};
use crate::sources::{FsFetcher, HttpFetcher, RoutingFetcher};
use crate::state::Item;
use crate::theme::{Settings, ThemeChoice, client_state_path, recent_path};
use crate::viewport::{
    AnimationData, AnimationError, AnimationRenderer, ElementId, GzipDecompressor,
    PlaybackOptions, VisibilitySource,
};

/// Application result type for the command-line host.
type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Visibility source that never reports anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullVisibility;

impl VisibilitySource for NullVisibility {
    fn observe(&mut self, _element: ElementId) {}
    fn unobserve(&mut self, _element: ElementId) {}
    fn disconnect(&mut self) {}
}

/// Nav strip with no rendered entries.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullNavStrip;

impl NavStrip for NullNavStrip {
    fn width(&self) -> f32 {
        0.0
    }

    fn entry_bounds(&self, _key: &SectionKey) -> Option<Bounds> {
        None
    }

    fn set_entry_visible(&mut self, _key: &SectionKey, _visible: bool) {}

    fn scroll_entry_into_view(&mut self, _key: &SectionKey, _align: ScrollAlign) {}

    fn scroll_by(&mut self, _dx: f32) {}
}

/// Renderer that accepts every animation and only logs it.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeadlessRenderer;

impl AnimationRenderer for HeadlessRenderer {
    fn load_animation(
        &mut self,
        container: ElementId,
        data: &AnimationData,
        options: &PlaybackOptions,
    ) -> std::result::Result<(), AnimationError> {
        tracing::debug!(
            element = container.raw(),
            width = data.w,
            height = data.h,
            seconds = data.duration_secs(),
            looping = options.looping,
            "Animation decoded"
        );
        Ok(())
    }
}

/// Sink printing every sent sticker as pretty JSON.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutSink;

impl StickerSink for StdoutSink {
    fn send_sticker(&mut self, item: &Item) {
        match serde_json::to_string_pretty(item) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::error!(id = %item.id, error = %e, "Failed to serialize sticker"),
        }
    }
}

/// What: Apply command-line overrides on top of the settings file.
pub fn apply_overrides(args: &Args, settings: &mut Settings) {
    if let Some(base) = &args.base {
        settings.packs_base_url.clone_from(base);
    }
}

/// What: Build an [`App`] wired to the terminal host.
#[must_use]
pub fn headless_app(settings: &Settings, manifest_override: Option<&str>) -> App {
    let config = AppConfig::from_settings(settings, manifest_override);
    let fetcher = RoutingFetcher::new(
        HttpFetcher::new(Duration::from_secs(settings.request_timeout_secs)),
        FsFetcher::new("."),
    );
    App::new(
        config,
        Collaborators {
            fetcher: Arc::new(fetcher),
            decompressor: Arc::new(GzipDecompressor),
            renderer: Box::new(HeadlessRenderer),
            sink: Box::new(StdoutSink),
            recency: Box::new(LruRecencyStore::open(
                recent_path(),
                settings.recent_capacity,
            )),
            store: Box::new(JsonFileStore::open(client_state_path())),
            image_source: Box::new(NullVisibility),
            animation_source: Box::new(NullVisibility),
            section_source: Box::new(NullVisibility),
            nav: Box::new(NullNavStrip),
        },
    )
}

/// What: Run the command-line host.
///
/// Inputs:
/// - `args`: Parsed command-line arguments.
///
/// Output:
/// - `Ok(())` after printing the listing or the sent sticker.
///
/// # Errors
/// - Pack maintenance failures, an unknown `--send` id, or a failed pack load.
///
/// Details:
/// - Pack maintenance flags run on their own and exit without loading.
/// - Otherwise loads every pack (optionally reloading), applies the theme and row
///   preferences, sends the requested sticker, and prints the listing.
pub async fn run(args: &Args) -> Result<()> {
    let mut settings = crate::theme::settings();
    apply_overrides(args, &mut settings);
    let base = settings.packs_base_url.clone();

    if let Some(file) = &args.add_pack {
        return packs::handle_add_pack(&base, file);
    }
    if args.remove_all_packs {
        return packs::handle_remove_pack(&base, None);
    }
    if let Some(name) = &args.remove_pack {
        return packs::handle_remove_pack(&base, Some(name));
    }

    let mut app = headless_app(&settings, args.config.as_deref());
    tracing::debug!(
        root_margin_px = app.image_observer_options().root_margin_px,
        "Thumbnail visibility source is inert in the terminal"
    );
    if let Some(raw) = &args.theme {
        match ThemeChoice::parse(raw) {
            Some(choice) => app.set_theme(choice),
            None => tracing::warn!(theme = %raw, "Unsupported theme; keeping current"),
        }
    }
    if let Some(rows) = args.stickers_per_row {
        app.set_stickers_per_row(rows);
    }

    app.start();
    app.wait_for_load().await;
    if args.reload {
        app.reload();
        app.wait_for_load().await;
    }
    if let Some(integration) = app.integration() {
        tracing::info!(
            prefix = ?integration.mxc_prefix,
            "GIF search integration configured"
        );
    }

    let result = finish(&mut app, args);
    app.teardown();
    result
}

/// Send and print once packs are loaded.
fn finish(app: &mut App, args: &Args) -> Result<()> {
    if let Some(id) = &args.send {
        if app.send(id).is_none() {
            return Err(format!("unknown sticker id: {id}").into());
        }
        return Ok(());
    }
    if args.recent {
        print!("{}", render_pool(app.recent()));
        return Ok(());
    }
    if let Some(term) = &args.search {
        app.search(term);
    }
    print!("{}", render_listing(app.frame()));
    match app.load_state().error() {
        Some(message) => Err(format!("failed to load packs: {message}").into()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: `--base` replaces the configured packs base.
    fn base_override() {
        let mut settings = Settings::default();
        apply_overrides(&Args::default(), &mut settings);
        assert_eq!(settings.packs_base_url, "packs");

        let args = Args {
            base: Some("web/packs".into()),
            ..Args::default()
        };
        apply_overrides(&args, &mut settings);
        assert_eq!(settings.packs_base_url, "web/packs");
    }

    #[test]
    /// What: The headless renderer accepts animations and the null strip has no entries.
    fn inert_host_pieces() {
        let data: AnimationData = serde_json::from_str(r#"{"fr":30,"ip":0,"op":30,"w":1,"h":1}"#)
            .expect("animation");
        assert!(
            HeadlessRenderer
                .load_animation(ElementId::from_raw(1), &data, &PlaybackOptions::default())
                .is_ok()
        );
        assert!(NullNavStrip.entry_bounds(&SectionKey::Recent).is_none());
    }
}
