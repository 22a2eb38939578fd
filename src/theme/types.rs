use std::fmt;

/// Smallest allowed number of stickers per row.
pub const MIN_STICKERS_PER_ROW: u8 = 2;
/// Largest allowed number of stickers per row.
pub const MAX_STICKERS_PER_ROW: u8 = 10;
/// Stickers per row when nothing is stored.
pub const DEFAULT_STICKERS_PER_ROW: u8 = 4;

/// Colour theme of the picker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    /// Light background.
    #[default]
    Light,
    /// Dark background.
    Dark,
    /// Pure black background.
    Black,
}

impl Theme {
    /// All supported themes.
    pub const ALL: [Self; 3] = [Self::Light, Self::Dark, Self::Black];

    /// Config/storage name of the theme.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Black => "black",
        }
    }

    /// What: Look a theme up by name.
    ///
    /// Output:
    /// - `None` for anything but `light`, `dark`, `black` (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "black" => Some(Self::Black),
            _ => None,
        }
    }

    /// CSS-style class name, e.g. `theme-dark`.
    #[must_use]
    pub fn class_name(self) -> String {
        format!("theme-{}", self.as_str())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A theme selection from the settings panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeChoice {
    /// Follow the session default and drop any stored override.
    Default,
    /// Store an explicit override.
    Explicit(Theme),
}

impl ThemeChoice {
    /// What: Parse a settings panel value.
    ///
    /// Output:
    /// - `Default` for `default`, `Explicit` for a supported theme, `None` otherwise.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        if value.trim().eq_ignore_ascii_case("default") {
            Some(Self::Default)
        } else {
            Theme::from_name(value).map(Self::Explicit)
        }
    }
}

/// What: Pick the active theme from a stored override and the session default.
///
/// Output:
/// - The override when it names a supported theme, otherwise `default`.
#[must_use]
pub fn resolve_theme(stored_override: Option<&str>, default: Theme) -> Theme {
    stored_override
        .and_then(Theme::from_name)
        .unwrap_or(default)
}

/// What: Interpret a stored stickers-per-row value.
///
/// Output:
/// - Values clamped into `2..=10`; unparsable input gives the default.
#[must_use]
pub fn parse_stickers_per_row(raw: &str) -> u8 {
    raw.trim()
        .parse::<i64>()
        .map_or(DEFAULT_STICKERS_PER_ROW, clamp_stickers_per_row)
}

/// Clamp a requested row size into the supported range.
#[must_use]
pub fn clamp_stickers_per_row(value: i64) -> u8 {
    let clamped = value.clamp(
        i64::from(MIN_STICKERS_PER_ROW),
        i64::from(MAX_STICKERS_PER_ROW),
    );
    u8::try_from(clamped).unwrap_or(DEFAULT_STICKERS_PER_ROW)
}

/// Runtime settings loaded from `settings.conf`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Base path or URL holding the manifest, pack files and thumbnails.
    pub packs_base_url: String,
    /// Explicit manifest location; `<packs_base_url>/index.json` when unset.
    pub manifest_url: Option<String>,
    /// Session default theme.
    pub default_theme: Theme,
    /// Maximum number of recently used ids kept.
    pub recent_capacity: usize,
    /// Margin around the list at which thumbnails start loading.
    pub image_root_margin_px: u32,
    /// Overall HTTP request timeout.
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            packs_base_url: "packs".to_string(),
            manifest_url: None,
            default_theme: Theme::Light,
            recent_capacity: 16,
            image_root_margin_px: crate::viewport::IMAGE_ROOT_MARGIN_PX,
            request_timeout_secs: 30,
        }
    }
}
