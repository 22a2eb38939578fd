use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use super::paths::settings_path;
use super::types::{Settings, Theme};

/// Byte offset of `marker` when it starts a comment (line start or after whitespace).
fn comment_start(s: &str, marker: &str) -> Option<usize> {
    s.match_indices(marker)
        .map(|(i, _)| i)
        .find(|&i| i == 0 || s[..i].ends_with(char::is_whitespace))
}

/// What: Strip a trailing `//` or `#` comment from a value.
///
/// Details:
/// - Markers only count at the start or after whitespace, so URLs and fragments survive.
pub(crate) fn strip_inline_comment(s: &str) -> &str {
    let cut = ["//", "#"]
        .iter()
        .filter_map(|marker| comment_start(s, marker))
        .min()
        .unwrap_or(s.len());
    s[..cut].trim()
}

/// What: Parse settings from `settings.conf` content.
///
/// Inputs:
/// - `content`: File contents.
/// - `settings`: Settings to update in place.
///
/// Details:
/// - `key = value` lines; blank lines and `#`/`//` comment lines are skipped.
/// - Keys are case-insensitive and `.`/`-`/space are treated as `_`.
/// - Invalid values leave the previous value untouched; unknown keys are ignored.
pub fn parse_settings(content: &str, settings: &mut Settings) {
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
            continue;
        }
        let Some((raw_key, raw_val)) = trimmed.split_once('=') else {
            continue;
        };
        let key = raw_key.trim().to_lowercase().replace(['.', '-', ' '], "_");
        let val = strip_inline_comment(raw_val.trim());
        match key.as_str() {
            "packs_base_url" | "base_url" => {
                if !val.is_empty() {
                    settings.packs_base_url = val.to_string();
                }
            }
            "manifest_url" | "config" => {
                settings.manifest_url = (!val.is_empty()).then(|| val.to_string());
            }
            "default_theme" | "theme" => {
                if let Some(theme) = Theme::from_name(val) {
                    settings.default_theme = theme;
                } else {
                    warn!(value = val, "[Config] Unsupported theme, keeping default");
                }
            }
            "recent_capacity" | "frequently_used_limit" => {
                if let Ok(v) = val.parse::<usize>()
                    && v > 0
                {
                    settings.recent_capacity = v;
                }
            }
            "image_root_margin_px" => {
                if let Ok(v) = val.parse::<u32>() {
                    settings.image_root_margin_px = v;
                }
            }
            "request_timeout_secs" => {
                if let Ok(v) = val.parse::<u64>()
                    && v > 0
                {
                    settings.request_timeout_secs = v;
                }
            }
            _ => {}
        }
    }
}

/// What: Load settings from an explicit file.
///
/// Output:
/// - Parsed settings, or defaults when the file is missing or unreadable.
#[must_use]
pub fn load_settings_from(path: &Path) -> Settings {
    let mut out = Settings::default();
    match fs::read_to_string(path) {
        Ok(content) => {
            debug!(path = %path.display(), bytes = content.len(), "[Config] Loaded settings.conf");
            parse_settings(&content, &mut out);
        }
        Err(_) => {
            debug!(path = %path.display(), "[Config] settings.conf missing or unreadable, using defaults");
        }
    }
    out
}

/// Load settings from the user's `settings.conf`.
#[must_use]
pub fn settings() -> Settings {
    load_settings_from(&settings_path())
}
