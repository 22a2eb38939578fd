//! Background workers spawned onto the tokio runtime.
//!
//! Workers never touch orchestrator state; they report through unbounded
//! channels and the orchestrator applies results on its own task.

/// Fetch, decompress and parse one animated asset.
pub mod animation;
/// Sequential manifest and pack loading.
pub mod loader;

pub use animation::{AnimationReady, run_animation_job, spawn_animation_job};
pub use loader::{
    LoadError, LoadOutcome, LoadRequest, LoaderEvent, run_pack_loader, spawn_pack_loader,
};
