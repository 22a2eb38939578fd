//! Theme, layout preferences and settings for the picker.

/// Config and log locations.
mod paths;
/// `settings.conf` parsing.
mod settings;
/// Theme and settings types.
mod types;

pub use paths::{client_state_path, config_dir, logs_dir, recent_path, settings_path};
pub use settings::{load_settings_from, parse_settings, settings};
pub use types::{
    DEFAULT_STICKERS_PER_ROW, MAX_STICKERS_PER_ROW, MIN_STICKERS_PER_ROW, Settings, Theme,
    ThemeChoice, clamp_stickers_per_row, parse_stickers_per_row, resolve_theme,
};
