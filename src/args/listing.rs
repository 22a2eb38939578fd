//! Plain-text rendering of a [`Frame`] for the terminal.

use std::fmt::Write as _;

use crate::state::Pack;
use crate::ui::{Frame, Screen, TileKind};

/// What: Render a frame as a plain-text listing.
///
/// Output:
/// - One heading per section followed by one line per sticker; status screens
///   render as a single line.
#[must_use]
pub fn render_listing(frame: &Frame) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Theme: {}  Stickers per row: {}",
        frame.theme, frame.stickers_per_row
    );
    match &frame.screen {
        Screen::Loading => out.push_str("Loading...\n"),
        Screen::Error { message } => {
            let _ = writeln!(out, "Error: {message}");
        }
        Screen::Empty => out.push_str("No packs found\n"),
        Screen::Content(content) => {
            if content.search_empty {
                let _ = writeln!(out, "No stickers match \"{}\"", content.search_term);
            }
            for section in &content.sections {
                let _ = writeln!(out, "== {} [{}] ==", section.title, section.key.id());
                for tile in &section.tiles {
                    let kind = match tile.kind {
                        TileKind::Image { .. } => "image",
                        TileKind::Animation { .. } => "animated",
                    };
                    let _ = writeln!(out, "  {}  {}  ({kind})", tile.item.id, tile.item.body);
                }
            }
        }
    }
    out
}

/// Render one pool as a listing (used for `--recent`).
#[must_use]
pub fn render_pool(pool: &Pack) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", pool.title);
    if pool.items.is_empty() {
        out.push_str("  (none)\n");
    }
    for item in &pool.items {
        let _ = writeln!(out, "  {}  {}", item.id, item.body);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::item;
    use crate::theme::Theme;

    #[test]
    /// What: Status screens render as one line after the header.
    fn status_screens() {
        let frame = Frame {
            theme: Theme::Dark,
            stickers_per_row: 4,
            screen: Screen::Error {
                message: "Not Found".into(),
            },
        };
        assert_eq!(
            render_listing(&frame),
            "Theme: dark  Stickers per row: 4\nError: Not Found\n"
        );
    }

    #[test]
    /// What: A pool lists every item or a placeholder when empty.
    fn pool_listing() {
        let mut pool = Pack::empty("frequently-used", "Frequently used");
        assert!(render_pool(&pool).contains("(none)"));
        pool.items.push(item("s1", "mxc://x/s1.png"));
        assert_eq!(
            render_pool(&pool),
            "== Frequently used ==\n  s1  s1 sticker\n"
        );
    }
}
