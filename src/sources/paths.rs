/// Manifest file name expected under the packs base path.
pub const MANIFEST_FILE: &str = "index.json";

/// What: Decide whether a pack source is an absolute HTTP(S) URL.
///
/// Output:
/// - `true` for `http://` and `https://` locations; relative sources are resolved
///   against the packs base path instead.
#[must_use]
pub fn is_absolute_url(source: &str) -> bool {
    source.starts_with("https://") || source.starts_with("http://")
}

/// Location rules for the pack origin: where the manifest lives, how pack
/// sources resolve, and where thumbnails are served from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackPaths {
    /// Base path (or URL) holding the manifest, pack files, and thumbnails.
    base: String,
    /// Manifest location; defaults to `<base>/index.json`.
    manifest: String,
}

impl PackPaths {
    /// What: Build location rules from a base path and an optional manifest override.
    ///
    /// Inputs:
    /// - `base`: Packs base path or URL (trailing slashes are ignored).
    /// - `manifest_override`: Explicit manifest location, if configured.
    #[must_use]
    pub fn new(base: &str, manifest_override: Option<&str>) -> Self {
        let base = base.trim_end_matches('/').to_string();
        let manifest = manifest_override
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map_or_else(|| format!("{base}/{MANIFEST_FILE}"), str::to_string);
        Self { base, manifest }
    }

    /// Packs base path.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Manifest location.
    #[must_use]
    pub fn manifest(&self) -> &str {
        &self.manifest
    }

    /// What: Resolve a manifest pack source to a fetchable location.
    ///
    /// Output:
    /// - Absolute URLs unchanged; relative sources joined onto the base path.
    #[must_use]
    pub fn resolve_source(&self, source: &str) -> String {
        if is_absolute_url(source) {
            source.to_string()
        } else {
            format!("{}/{}", self.base, source.trim_start_matches('/'))
        }
    }

    /// What: Resolve an item asset URL against the site holding the packs base.
    ///
    /// Output:
    /// - URLs with a scheme unchanged; relative URLs joined onto the parent of
    ///   the base, so `packs/x.tgs` under base `web/packs` becomes `web/packs/x.tgs`.
    #[must_use]
    pub fn resolve_asset(&self, url: &str) -> String {
        if url.contains("://") {
            return url.to_string();
        }
        match self.site_root() {
            Some(root) => format!("{root}/{}", url.trim_start_matches('/')),
            None => url.to_string(),
        }
    }

    /// Parent of the base path; `None` when the base is a single relative segment.
    fn site_root(&self) -> Option<&str> {
        let (parent, _) = self.base.rsplit_once('/')?;
        if parent.ends_with(":/") {
            return Some(&self.base);
        }
        Some(parent)
    }

    /// What: Derive the thumbnail location for an item asset URL.
    ///
    /// Output:
    /// - `<base>/thumbnails/<last path segment of url>`.
    #[must_use]
    pub fn thumbnail_url(&self, item_url: &str) -> String {
        let file = item_url.rsplit('/').next().unwrap_or(item_url);
        format!("{}/thumbnails/{file}", self.base)
    }
}

impl Default for PackPaths {
    fn default() -> Self {
        Self::new("packs", None)
    }
}
