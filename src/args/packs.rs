//! Command-line pack directory maintenance.

use std::path::Path;

use crate::catalog::{self, CatalogReport};
use crate::sources::is_absolute_url;

/// Application result type for the command-line host.
type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// What: Resolve the local pack directory from the configured base.
///
/// # Errors
/// - When the base is a remote URL.
fn local_dir(base: &str) -> Result<&Path> {
    if is_absolute_url(base) {
        return Err(format!("cannot maintain remote pack origin {base}").into());
    }
    Ok(Path::new(base))
}

fn print_report(report: &CatalogReport) {
    for step in &report.steps {
        println!("{step}");
    }
}

/// What: Register a pack file in the base directory's manifest.
///
/// Inputs:
/// - `base`: Packs base directory.
/// - `file`: Pack file path; only its file name is recorded.
///
/// # Errors
/// - Remote base, missing directory, or an unreadable manifest.
pub fn handle_add_pack(base: &str, file: &str) -> Result<()> {
    tracing::info!(base = %base, file = %file, "Add pack requested from CLI");
    let dir = local_dir(base)?;
    let name = Path::new(file)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| format!("invalid pack file name: {file}"))?;
    let step = catalog::add_to_index(dir, name)?;
    println!("{step}");
    Ok(())
}

/// What: Remove one pack, or every pack, from the base directory.
///
/// Inputs:
/// - `base`: Packs base directory.
/// - `name`: Pack name without `.json`; `None` removes all packs.
///
/// # Errors
/// - Remote base or missing directory. Individual step failures are printed
///   and do not abort the removal.
pub fn handle_remove_pack(base: &str, name: Option<&str>) -> Result<()> {
    tracing::info!(base = %base, pack = ?name, "Remove pack requested from CLI");
    let dir = local_dir(base)?;
    let report = match name {
        Some(name) => catalog::remove_pack(dir, name.trim_end_matches(".json"))?,
        None => catalog::remove_all_packs(dir)?,
    };
    print_report(&report);
    if report.has_failures() {
        tracing::warn!("Some removal steps failed");
    }
    Ok(())
}
