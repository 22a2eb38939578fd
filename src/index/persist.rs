use std::sync::Arc;

use crate::state::{Item, ItemRef};

/// What: Serialize resolved recent items as the persisted snapshot.
///
/// Inputs:
/// - `items`: Resolved recent items in display order.
///
/// Output:
/// - JSON array of `[id, item]` pairs; an empty array if serialization fails.
///
/// Details:
/// - Pair form lets the snapshot seed the item index directly on the next start.
#[must_use]
pub fn encode_snapshot(items: &[ItemRef]) -> String {
    let pairs: Vec<(&str, &Item)> = items.iter().map(|i| (i.id.as_str(), i.as_ref())).collect();
    match serde_json::to_string(&pairs) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "[Recent] Failed to encode recent snapshot");
            "[]".to_string()
        }
    }
}

/// What: Parse a persisted snapshot back into items.
///
/// Inputs:
/// - `raw`: Stored snapshot text.
///
/// Output:
/// - `Some(items)` in stored order, or `None` when the text is malformed.
///
/// Details:
/// - Malformed content is logged and treated as "no snapshot" so a corrupted
///   cache never blocks startup.
#[must_use]
pub fn decode_snapshot(raw: &str) -> Option<Vec<ItemRef>> {
    match serde_json::from_str::<Vec<(String, Item)>>(raw) {
        Ok(pairs) => Some(
            pairs
                .into_iter()
                .map(|(id, mut item)| {
                    if item.id.is_empty() {
                        item.id = id;
                    }
                    Arc::new(item)
                })
                .collect(),
        ),
        Err(e) => {
            tracing::warn!(
                error = %e,
                bytes = raw.len(),
                "[Recent] Ignoring malformed recent snapshot"
            );
            None
        }
    }
}
