//! Command-line argument definition.

use clap::Parser;

/// Sticker picker - load sticker packs, search them, and send stickers from the command line
#[derive(Parser, Debug, Default)]
#[command(name = "stickerpicker")]
#[command(version)]
#[command(about = "Load sticker packs, search them, and send stickers from the command line", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Args {
    /// Manifest location overriding `<base>/index.json`
    #[arg(long)]
    pub config: Option<String>,

    /// Packs base directory or URL (overrides `packs_base_url` in settings.conf)
    #[arg(long)]
    pub base: Option<String>,

    /// Show only stickers whose label or id contains the term
    #[arg(short, long)]
    pub search: Option<String>,

    /// Send the sticker with this id and print it as JSON
    #[arg(long)]
    pub send: Option<String>,

    /// Print only the recently used stickers
    #[arg(long)]
    pub recent: bool,

    /// Reload every pack bypassing caches after the first load
    #[arg(long)]
    pub reload: bool,

    /// Register a pack file in the base directory's index.json
    #[arg(long, value_name = "FILE")]
    pub add_pack: Option<String>,

    /// Remove a pack (name without .json) with its thumbnails from the base directory
    #[arg(long, value_name = "NAME")]
    pub remove_pack: Option<String>,

    /// Remove every pack from the base directory
    #[arg(long)]
    pub remove_all_packs: bool,

    /// Theme override to persist (light, dark, black, or default)
    #[arg(long)]
    pub theme: Option<String>,

    /// Stickers per row to persist (clamped to 2..=10)
    #[arg(long)]
    pub stickers_per_row: Option<i64>,

    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Enable verbose output (equivalent to --log-level debug)
    #[arg(short, long)]
    pub verbose: bool,
}
