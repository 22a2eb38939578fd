//! Command-line argument parsing and the headless host.

pub mod definition;
pub mod host;
pub mod listing;
pub mod packs;
pub mod utils;

// Re-export commonly used items
pub use definition::Args;
pub use host::run;
pub use utils::determine_log_level;
