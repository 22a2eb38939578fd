//! Core value types used by the picker state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// File extension marking an item whose asset is a gzip-compressed animation.
pub const ANIMATED_EXTENSION: &str = ".tgs";

/// A single selectable sticker.
///
/// `url` identifies the asset location and `body` is the human-readable label
/// used for display and search. Any additional fields present in the pack file
/// (upload info, origin metadata) are kept in `extra` so the host receives the
/// item exactly as it was published.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Identifier, unique within a session's index (later loads overwrite).
    pub id: String,
    /// Asset location (content URI or plain URL).
    pub url: String,
    /// Label shown as alt text and matched by search.
    #[serde(default)]
    pub body: String,
    /// Remaining fields of the published item, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    /// What: Report whether the item's asset is an animation that needs decoding.
    ///
    /// Output:
    /// - `true` when `url` ends with the animated extension.
    #[must_use]
    pub fn is_animated(&self) -> bool {
        self.url.ends_with(ANIMATED_EXTENSION)
    }

    /// Final path segment of `url`, used to derive the thumbnail file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.url.rsplit('/').next().unwrap_or(&self.url)
    }
}

/// Shared handle to an immutable item; packs, the index, and filtered views
/// all point at the same allocation.
pub type ItemRef = Arc<Item>;

/// An ordered group of items displayed as one section.
#[derive(Clone, Debug, PartialEq)]
pub struct Pack {
    /// Pack identifier, used for section and nav anchors.
    pub id: String,
    /// Section heading.
    pub title: String,
    /// Items in display order.
    pub items: Vec<ItemRef>,
}

impl Pack {
    /// Create a pack with no items.
    #[must_use]
    pub fn empty(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            items: Vec::new(),
        }
    }

    /// First item of the pack, used as the nav icon.
    #[must_use]
    pub fn cover(&self) -> Option<&ItemRef> {
        self.items.first()
    }
}

/// Wire shape of a pack file: `{id, title, stickers: [...]}`.
#[derive(Clone, Debug, Deserialize)]
pub struct PackFile {
    /// Pack identifier.
    pub id: String,
    /// Pack title.
    #[serde(default)]
    pub title: String,
    /// Items as published.
    #[serde(default)]
    pub stickers: Vec<Item>,
}

impl From<PackFile> for Pack {
    fn from(file: PackFile) -> Self {
        Self {
            id: file.id,
            title: file.title,
            items: file.stickers.into_iter().map(Arc::new).collect(),
        }
    }
}

/// Wire shape of the manifest that lists the pack files to load.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Manifest {
    /// Pack sources in declaration order: relative paths or absolute URLs.
    #[serde(rename = "packs", default)]
    pub item_sources: Vec<String>,
    /// Optional API key for the third-party GIF search integration.
    #[serde(default)]
    pub giphy_api_key: Option<String>,
    /// Optional content URI prefix used by the GIF integration.
    #[serde(default)]
    pub giphy_mxc_prefix: Option<String>,
}

impl Manifest {
    /// What: Extract the optional integration credentials declared by the manifest.
    ///
    /// Output:
    /// - `Some(IntegrationConfig)` when an API key is present, `None` otherwise.
    #[must_use]
    pub fn integration(&self) -> Option<IntegrationConfig> {
        self.giphy_api_key.as_ref().map(|key| IntegrationConfig {
            api_key: key.clone(),
            mxc_prefix: self.giphy_mxc_prefix.clone(),
        })
    }
}

/// Credentials for the GIF search integration, handed to the host untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntegrationConfig {
    /// API key.
    pub api_key: String,
    /// Optional content URI prefix for uploaded GIFs.
    pub mxc_prefix: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Parse a pack file carrying extra per-item metadata.
    ///
    /// Inputs:
    /// - Pack JSON with one static and one animated sticker, each with extra fields.
    ///
    /// Output:
    /// - Items keep order, extra fields survive, animation detection follows the URL suffix.
    fn pack_file_keeps_order_and_extra_fields() {
        let raw = r#"{
            "id": "tg-1",
            "title": "Cats",
            "stickers": [
                {"id": "a", "url": "mxc://host/aaa", "body": "Cat", "info": {"w": 256}},
                {"id": "b", "url": "mxc://host/bbb.tgs", "body": "Dancing cat"}
            ]
        }"#;
        let file: PackFile = serde_json::from_str(raw).expect("pack should parse");
        let pack = Pack::from(file);

        assert_eq!(pack.title, "Cats");
        let ids: Vec<&str> = pack.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(pack.items[0].extra.contains_key("info"));
        assert!(!pack.items[0].is_animated());
        assert!(pack.items[1].is_animated());
        assert_eq!(pack.items[1].file_name(), "bbb.tgs");
    }

    #[test]
    /// What: Manifest integration credentials are optional.
    fn manifest_integration_is_optional() {
        let plain: Manifest =
            serde_json::from_str(r#"{"packs": ["a.json"]}"#).expect("manifest should parse");
        assert_eq!(plain.item_sources, vec!["a.json"]);
        assert!(plain.integration().is_none());

        let with_key: Manifest = serde_json::from_str(
            r#"{"packs": [], "giphy_api_key": "k", "giphy_mxc_prefix": "mxc://giphy/"}"#,
        )
        .expect("manifest should parse");
        assert_eq!(
            with_key.integration(),
            Some(IntegrationConfig {
                api_key: "k".into(),
                mxc_prefix: Some("mxc://giphy/".into()),
            })
        );
    }
}
