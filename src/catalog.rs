//! Maintenance of a local pack directory.
//!
//! A pack directory holds `index.json` (the manifest), one JSON file per pack
//! and a `thumbnails/` folder. These helpers register new pack files and remove
//! packs together with their thumbnails, reporting every step and carrying on
//! past individual failures.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::sources::MANIFEST_FILE;

/// Thumbnail extensions probed when removing a pack.
pub const THUMBNAIL_EXTENSIONS: [&str; 5] = ["webp", "png", "jpg", "jpeg", "gif"];

/// Failure that prevents a catalog operation from running at all.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The pack directory does not exist.
    #[error("pack directory {0} does not exist")]
    MissingDir(PathBuf),
    /// Reading or writing a file failed.
    #[error("{path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A file was not valid JSON.
    #[error("{path}: invalid JSON: {source}")]
    Json {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// One thing a catalog operation did (or could not do).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogStep {
    /// Pack file added to the manifest.
    Registered(String),
    /// Pack file was already listed.
    AlreadyRegistered(String),
    /// Pack file removed from the manifest.
    Unregistered(String),
    /// Pack file was not listed.
    NotRegistered(String),
    /// The manifest became empty and was deleted.
    ManifestDeleted,
    /// No manifest to update.
    ManifestMissing,
    /// A file was deleted.
    Deleted(PathBuf),
    /// The pack file did not exist.
    PackMissing(PathBuf),
    /// A step failed; the operation continued.
    Failed {
        /// File involved.
        path: PathBuf,
        /// Error text.
        error: String,
    },
}

impl fmt::Display for CatalogStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registered(file) => write!(f, "Added {file} to {MANIFEST_FILE}"),
            Self::AlreadyRegistered(file) => write!(f, "{file} is already in {MANIFEST_FILE}"),
            Self::Unregistered(file) => write!(f, "Removed {file} from {MANIFEST_FILE}"),
            Self::NotRegistered(file) => write!(f, "Did not find {file} in {MANIFEST_FILE}"),
            Self::ManifestDeleted => write!(f, "No packs remain, deleted {MANIFEST_FILE}"),
            Self::ManifestMissing => write!(f, "{MANIFEST_FILE} not found, skipped"),
            Self::Deleted(path) => write!(f, "Deleted {}", path.display()),
            Self::PackMissing(path) => write!(f, "Did not find {}, skipped", path.display()),
            Self::Failed { path, error } => write!(f, "Error with {}: {error}", path.display()),
        }
    }
}

/// Steps performed by one catalog operation, in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogReport {
    /// Steps in execution order.
    pub steps: Vec<CatalogStep>,
}

impl CatalogReport {
    /// Whether any step failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.steps
            .iter()
            .any(|s| matches!(s, CatalogStep::Failed { .. }))
    }

    fn push(&mut self, step: CatalogStep) {
        tracing::info!(step = %step, "[Catalog] Step");
        self.steps.push(step);
    }

    fn fail(&mut self, path: &Path, error: impl fmt::Display) {
        tracing::warn!(path = %path.display(), error = %error, "[Catalog] Step failed");
        self.steps.push(CatalogStep::Failed {
            path: path.to_path_buf(),
            error: error.to_string(),
        });
    }
}

fn read_json(path: &Path) -> Result<Value, CatalogError> {
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CatalogError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json(path: &Path, value: &Value) -> Result<(), CatalogError> {
    let mut out = serde_json::to_string_pretty(value).map_err(|source| CatalogError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    out.push('\n');
    fs::write(path, out).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn ensure_dir(dir: &Path) -> Result<(), CatalogError> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(CatalogError::MissingDir(dir.to_path_buf()))
    }
}

/// What: Register a pack file in the directory's manifest.
///
/// Inputs:
/// - `dir`: Pack directory.
/// - `pack_file`: Pack file name relative to `dir` (e.g. `cats.json`).
///
/// Output:
/// - `Registered` or `AlreadyRegistered`.
///
/// # Errors
/// - The directory is missing, or the manifest cannot be read, parsed or written.
///
/// Details:
/// - A missing manifest is created. Other manifest fields are kept as they are.
pub fn add_to_index(dir: &Path, pack_file: &str) -> Result<CatalogStep, CatalogError> {
    ensure_dir(dir)?;
    let path = dir.join(MANIFEST_FILE);
    let mut manifest = if path.exists() {
        read_json(&path)?
    } else {
        Value::Object(Map::new())
    };
    let Some(obj) = manifest.as_object_mut() else {
        return Err(CatalogError::Json {
            path,
            source: serde::de::Error::custom("manifest is not an object"),
        });
    };
    let packs = obj
        .entry("packs")
        .or_insert_with(|| Value::Array(Vec::new()));
    if !packs.is_array() {
        *packs = Value::Array(Vec::new());
    }
    let Some(list) = packs.as_array_mut() else {
        return Ok(CatalogStep::AlreadyRegistered(pack_file.to_string()));
    };
    if list.iter().any(|v| v.as_str() == Some(pack_file)) {
        return Ok(CatalogStep::AlreadyRegistered(pack_file.to_string()));
    }
    list.push(Value::String(pack_file.to_string()));
    write_json(&path, &manifest)?;
    tracing::info!(pack = pack_file, manifest = %path.display(), "[Catalog] Registered pack");
    Ok(CatalogStep::Registered(pack_file.to_string()))
}

/// Thumbnail ids referenced by a pack file's items (`telegram.id`).
fn thumbnail_ids(pack: &Value) -> Vec<String> {
    pack.get("stickers")
        .and_then(Value::as_array)
        .map(|stickers| {
            stickers
                .iter()
                .filter_map(|s| s.get("telegram").and_then(|t| t.get("id")))
                .filter_map(|id| match id {
                    Value::String(s) if !s.is_empty() => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Delete one pack file and the thumbnails it references.
fn delete_pack_file(dir: &Path, pack_path: &Path, report: &mut CatalogReport) {
    let thumbnails = dir.join("thumbnails");
    match read_json(pack_path) {
        Ok(pack) => {
            for id in thumbnail_ids(&pack) {
                for ext in THUMBNAIL_EXTENSIONS {
                    let thumb = thumbnails.join(format!("{id}.{ext}"));
                    if !thumb.exists() {
                        continue;
                    }
                    match fs::remove_file(&thumb) {
                        Ok(()) => report.push(CatalogStep::Deleted(thumb)),
                        Err(e) => report.fail(&thumb, e),
                    }
                }
            }
        }
        Err(e) => report.fail(pack_path, e),
    }
    match fs::remove_file(pack_path) {
        Ok(()) => report.push(CatalogStep::Deleted(pack_path.to_path_buf())),
        Err(e) => report.fail(pack_path, e),
    }
}

/// Drop `pack_file` from the manifest, deleting the manifest once empty.
fn unregister(dir: &Path, pack_file: &str, report: &mut CatalogReport) {
    let path = dir.join(MANIFEST_FILE);
    if !path.exists() {
        report.push(CatalogStep::ManifestMissing);
        return;
    }
    let mut manifest = match read_json(&path) {
        Ok(m) => m,
        Err(e) => {
            report.fail(&path, e);
            return;
        }
    };
    let Some(list) = manifest.get_mut("packs").and_then(Value::as_array_mut) else {
        report.push(CatalogStep::NotRegistered(pack_file.to_string()));
        return;
    };
    let before = list.len();
    list.retain(|v| v.as_str() != Some(pack_file));
    if list.len() == before {
        report.push(CatalogStep::NotRegistered(pack_file.to_string()));
        return;
    }
    if list.is_empty() {
        match fs::remove_file(&path) {
            Ok(()) => report.push(CatalogStep::ManifestDeleted),
            Err(e) => report.fail(&path, e),
        }
        return;
    }
    match write_json(&path, &manifest) {
        Ok(()) => report.push(CatalogStep::Unregistered(pack_file.to_string())),
        Err(e) => report.fail(&path, e),
    }
}

/// What: Remove a pack from a pack directory.
///
/// Inputs:
/// - `dir`: Pack directory.
/// - `name`: Pack name without the `.json` extension.
///
/// Output:
/// - Report of every step.
///
/// # Errors
/// - Only when `dir` does not exist; every later failure is recorded in the
///   report and the remaining steps still run.
///
/// Details:
/// - The manifest entry goes first, then the pack's thumbnails, then the pack file.
pub fn remove_pack(dir: &Path, name: &str) -> Result<CatalogReport, CatalogError> {
    ensure_dir(dir)?;
    let pack_file = format!("{name}.json");
    let mut report = CatalogReport::default();
    unregister(dir, &pack_file, &mut report);

    let pack_path = dir.join(&pack_file);
    if pack_path.exists() {
        delete_pack_file(dir, &pack_path, &mut report);
    } else {
        report.push(CatalogStep::PackMissing(pack_path));
    }
    Ok(report)
}

/// What: Remove every pack from a pack directory.
///
/// # Errors
/// - Only when `dir` does not exist or cannot be listed.
///
/// Details:
/// - Deletes the manifest, then every other `*.json` file with its thumbnails.
pub fn remove_all_packs(dir: &Path) -> Result<CatalogReport, CatalogError> {
    ensure_dir(dir)?;
    let mut report = CatalogReport::default();
    let manifest = dir.join(MANIFEST_FILE);
    if manifest.exists() {
        match fs::remove_file(&manifest) {
            Ok(()) => report.push(CatalogStep::ManifestDeleted),
            Err(e) => report.fail(&manifest, e),
        }
    } else {
        report.push(CatalogStep::ManifestMissing);
    }

    let entries = fs::read_dir(dir).map_err(|source| CatalogError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut pack_paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    pack_paths.sort();
    for path in pack_paths {
        delete_pack_file(dir, &path, &mut report);
    }
    Ok(report)
}
