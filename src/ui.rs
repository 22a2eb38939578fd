//! Pure view model of the picker.
//!
//! A [`Frame`] is the complete description of one render: which screen is
//! shown, the nav strip entries, and the ordered list of sections with their
//! tiles. Hosts draw it; the orchestrator walks it to attach observers. Every
//! element carries an [`ElementId`] from the shared [`ElementRegistry`].


use crate::logic::SectionKey;
use crate::sources::PackPaths;
use crate::state::{FilterState, ItemRef, LoadState, Pack};
use crate::theme::Theme;
use crate::viewport::{ElementId, ElementKey, ElementRegistry};

/// Title of the settings section and nav entry.
pub const SETTINGS_TITLE: &str = "Settings";

/// One complete render.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Active theme.
    pub theme: Theme,
    /// Grid width of the sticker lists.
    pub stickers_per_row: u8,
    /// Screen content.
    pub screen: Screen,
}

/// Top-level screen states.
#[derive(Clone, Debug, PartialEq)]
pub enum Screen {
    /// Waiting for the first pack.
    Loading,
    /// Loading failed.
    Error {
        /// Underlying message.
        message: String,
    },
    /// Loading finished without packs.
    Empty,
    /// Regular picker content.
    Content(Content),
}

/// Nav strip plus section list.
#[derive(Clone, Debug, PartialEq)]
pub struct Content {
    /// Nav strip entries in display order.
    pub nav: Vec<NavEntry>,
    /// Current sanitized search term.
    pub search_term: String,
    /// Whether a search is active and nothing matched.
    pub search_empty: bool,
    /// Sections in display order; the settings section is always last.
    pub sections: Vec<Section>,
}

impl Content {
    /// Section keys in display order.
    #[must_use]
    pub fn section_order(&self) -> Vec<SectionKey> {
        self.sections.iter().map(|s| s.key.clone()).collect()
    }

    /// Section by key.
    #[must_use]
    pub fn section(&self, key: &SectionKey) -> Option<&Section> {
        self.sections.iter().find(|s| &s.key == key)
    }

    /// All tiles across sections, in display order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.sections.iter().flat_map(|s| s.tiles.iter())
    }
}

/// One entry in the nav strip.
#[derive(Clone, Debug, PartialEq)]
pub struct NavEntry {
    /// Section the entry jumps to.
    pub key: SectionKey,
    /// Target anchor, `pack-<id>`.
    pub href: String,
    /// Entry anchor, `nav-<id>`.
    pub anchor: String,
    /// Tooltip.
    pub title: String,
    /// Icon shown in the entry.
    pub icon: NavIcon,
}

/// Icon variants of a nav entry.
#[derive(Clone, Debug, PartialEq)]
pub enum NavIcon {
    /// Recently used icon.
    Recent,
    /// Settings icon.
    Settings,
    /// Pack without items.
    Placeholder,
    /// Static thumbnail of the pack's first item.
    Thumbnail {
        /// Thumbnail location.
        src: String,
        /// Alt text.
        alt: String,
    },
    /// Animated first item; started as soon as it is mounted.
    Animation {
        /// Container element.
        element: ElementId,
        /// Compressed animation location.
        url: String,
        /// Tooltip.
        title: String,
    },
}

/// One section of the list.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    /// Identity shared with the nav entry.
    pub key: SectionKey,
    /// Section element, watched by the section observer.
    pub element: ElementId,
    /// Anchor, `pack-<id>`.
    pub anchor: String,
    /// Heading.
    pub title: String,
    /// Item tiles; empty for the settings section.
    pub tiles: Vec<Tile>,
}

/// One item tile.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    /// Tile element.
    pub element: ElementId,
    /// Item shown; sending the tile sends this item's id.
    pub item: ItemRef,
    /// Asset kind.
    pub kind: TileKind,
}

/// How a tile's asset is loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TileKind {
    /// Thumbnail applied when the tile nears the viewport.
    Image {
        /// Location set as source on enter.
        pending_src: String,
    },
    /// Animation decoded the first time the tile becomes visible.
    Animation {
        /// Compressed animation location.
        url: String,
    },
}

/// State the view is derived from.
#[derive(Clone, Copy, Debug)]
pub struct ViewInput<'a> {
    /// Active theme.
    pub theme: Theme,
    /// Grid width.
    pub stickers_per_row: u8,
    /// Loaded packs and phase.
    pub load: &'a LoadState,
    /// Search state.
    pub filter: &'a FilterState,
    /// Resolved recent pool.
    pub recent: &'a Pack,
    /// Location rules for thumbnails.
    pub paths: &'a PackPaths,
}

/// What: Build a frame from state, mounting its elements in `registry`.
///
/// Inputs:
/// - `input`: State snapshot.
/// - `registry`: Registry inside an open render pass.
///
/// Output:
/// - The frame; screen precedence is loading, error, empty, content.
///
/// Details:
/// - Without a search the list shows the recent pool followed by every pack;
///   with a search it shows the filtered pools only.
/// - The nav strip always lists recent, every loaded pack, then settings.
pub fn build_frame(input: &ViewInput<'_>, registry: &mut ElementRegistry) -> Frame {
    let screen = if input.load.loading() {
        Screen::Loading
    } else if let Some(message) = input.load.error() {
        Screen::Error {
            message: message.to_string(),
        }
    } else if input.load.packs.is_empty() {
        Screen::Empty
    } else {
        Screen::Content(build_content(input, registry))
    };
    Frame {
        theme: input.theme,
        stickers_per_row: input.stickers_per_row,
        screen,
    }
}

fn build_content(input: &ViewInput<'_>, registry: &mut ElementRegistry) -> Content {
    let filter_active = input.filter.is_active();

    let mut nav = Vec::with_capacity(input.load.packs.len() + 2);
    nav.push(nav_entry(
        SectionKey::Recent,
        &input.recent.title,
        NavIcon::Recent,
    ));
    for pack in &input.load.packs {
        let key = SectionKey::for_pool(&pack.id);
        let icon = pack_icon(pack, &key, input.paths, registry);
        nav.push(nav_entry(key, &pack.title, icon));
    }
    nav.push(nav_entry(
        SectionKey::Settings,
        SETTINGS_TITLE,
        NavIcon::Settings,
    ));

    let pools: Vec<&Pack> = if filter_active {
        input.filter.packs.iter().collect()
    } else {
        std::iter::once(input.recent)
            .chain(input.load.packs.iter())
            .collect()
    };
    let mut sections: Vec<Section> = pools
        .into_iter()
        .map(|pool| build_section(pool, input.paths, registry))
        .collect();
    sections.push(Section {
        key: SectionKey::Settings,
        element: registry.mount(ElementKey::Section(SectionKey::Settings)),
        anchor: SectionKey::Settings.section_anchor(),
        title: SETTINGS_TITLE.to_string(),
        tiles: Vec::new(),
    });

    Content {
        nav,
        search_term: input.filter.term.clone(),
        search_empty: filter_active && input.filter.packs.is_empty(),
        sections,
    }
}

fn nav_entry(key: SectionKey, title: &str, icon: NavIcon) -> NavEntry {
    NavEntry {
        href: key.section_anchor(),
        anchor: key.nav_anchor(),
        title: title.to_string(),
        key,
        icon,
    }
}

fn pack_icon(
    pack: &Pack,
    key: &SectionKey,
    paths: &PackPaths,
    registry: &mut ElementRegistry,
) -> NavIcon {
    match pack.cover() {
        None => NavIcon::Placeholder,
        Some(item) if item.is_animated() => NavIcon::Animation {
            element: registry.mount(ElementKey::NavIcon(key.clone())),
            url: paths.resolve_asset(&item.url),
            title: item.body.clone(),
        },
        Some(item) => NavIcon::Thumbnail {
            src: paths.thumbnail_url(&item.url),
            alt: item.body.clone(),
        },
    }
}

fn build_section(pool: &Pack, paths: &PackPaths, registry: &mut ElementRegistry) -> Section {
    let key = SectionKey::for_pool(&pool.id);
    let tiles = pool
        .items
        .iter()
        .map(|item| {
            let element = registry.mount(ElementKey::Tile {
                section: key.clone(),
                item_id: item.id.clone(),
            });
            let kind = if item.is_animated() {
                TileKind::Animation {
                    url: paths.resolve_asset(&item.url),
                }
            } else {
                TileKind::Image {
                    pending_src: paths.thumbnail_url(&item.url),
                }
            };
            Tile {
                element,
                item: ItemRef::clone(item),
                kind,
            }
        })
        .collect();
    Section {
        element: registry.mount(ElementKey::Section(key.clone())),
        anchor: key.section_anchor(),
        title: pool.title.clone(),
        key,
        tiles,
    }
}
