use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::sources::{CacheMode, FetchResponse, Fetcher, PackPaths};
use crate::state::{IntegrationConfig, Manifest, Pack, PackFile};

/// Parameters of one load sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadRequest {
    /// Generation token stamped on every event of the sequence.
    pub generation: u64,
    /// Cache mode for every request of the sequence.
    pub cache: CacheMode,
}

/// Page-level load failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// Non-success status; displays as the bare status text.
    #[error("{status_text}")]
    Http {
        /// Status code.
        status: u16,
        /// Reason phrase shown to the user.
        status_text: String,
    },
    /// No response could be obtained.
    #[error("{0}")]
    Transport(String),
    /// Response body was not the expected document.
    #[error("{0}")]
    Parse(String),
}

/// How a load sequence ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Every declared pack was appended.
    Complete,
    /// The manifest does not exist; there are no packs.
    NotFound,
    /// The sequence stopped at the first failure.
    Failed(LoadError),
}

/// Progress report from a load sequence.
#[derive(Clone, Debug, PartialEq)]
pub enum LoaderEvent {
    /// Manifest parsed.
    ManifestReady {
        /// Sequence generation.
        generation: u64,
        /// Integration credentials declared by the manifest.
        integration: Option<IntegrationConfig>,
        /// Number of declared pack sources.
        declared: usize,
    },
    /// One pack parsed, in declaration order.
    PackLoaded {
        /// Sequence generation.
        generation: u64,
        /// The parsed pack.
        pack: Pack,
    },
    /// Sequence ended; no further events follow for this generation.
    Finished {
        /// Sequence generation.
        generation: u64,
        /// Terminal outcome.
        outcome: LoadOutcome,
    },
}

impl LoaderEvent {
    /// Generation the event belongs to.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        match self {
            Self::ManifestReady { generation, .. }
            | Self::PackLoaded { generation, .. }
            | Self::Finished { generation, .. } => *generation,
        }
    }
}

/// What: Spawn a load sequence onto the runtime.
///
/// Inputs:
/// - `fetcher`: Fetch capability shared with the orchestrator.
/// - `paths`: Manifest and pack location rules.
/// - `request`: Generation and cache mode.
/// - `tx`: Channel receiving progress events.
///
/// Output:
/// - Handle of the spawned task; aborting it stops the sequence at its next await point.
pub fn spawn_pack_loader(
    fetcher: Arc<dyn Fetcher>,
    paths: PackPaths,
    request: LoadRequest,
    tx: mpsc::UnboundedSender<LoaderEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        run_pack_loader(fetcher.as_ref(), &paths, request, &tx).await;
    })
}

/// What: Run one load sequence to completion.
///
/// Details:
/// - Fetches the manifest, then every declared pack strictly one after another so
///   packs arrive in declaration order.
/// - A missing manifest ends as [`LoadOutcome::NotFound`]; any other failure
///   ends as [`LoadOutcome::Failed`] after the packs that already arrived.
/// - Stops early when the receiver is gone.
pub async fn run_pack_loader(
    fetcher: &dyn Fetcher,
    paths: &PackPaths,
    request: LoadRequest,
    tx: &mpsc::UnboundedSender<LoaderEvent>,
) {
    let generation = request.generation;
    tracing::info!(
        generation,
        manifest = %paths.manifest(),
        cache = ?request.cache,
        "[Loader] Starting load sequence"
    );
    let outcome = match load_all(fetcher, paths, request, tx).await {
        Ok(Some(outcome)) => outcome,
        Ok(None) => {
            tracing::debug!(generation, "[Loader] Receiver dropped; stopping");
            return;
        }
        Err(e) => LoadOutcome::Failed(e),
    };
    match &outcome {
        LoadOutcome::Failed(e) => {
            tracing::warn!(generation, error = %e, "[Loader] Load sequence failed");
        }
        other => tracing::info!(generation, outcome = ?other, "[Loader] Load sequence finished"),
    }
    let _ = tx.send(LoaderEvent::Finished {
        generation,
        outcome,
    });
}

/// Inner sequence; `Ok(None)` means the receiver went away.
async fn load_all(
    fetcher: &dyn Fetcher,
    paths: &PackPaths,
    request: LoadRequest,
    tx: &mpsc::UnboundedSender<LoaderEvent>,
) -> Result<Option<LoadOutcome>, LoadError> {
    let generation = request.generation;
    let response = get(fetcher, paths.manifest(), request.cache).await?;
    if response.is_not_found() {
        tracing::info!(manifest = %paths.manifest(), "[Loader] Manifest not found; no packs");
        return Ok(Some(LoadOutcome::NotFound));
    }
    let manifest: Manifest = parse(&response, paths.manifest())?;
    let ready = LoaderEvent::ManifestReady {
        generation,
        integration: manifest.integration(),
        declared: manifest.item_sources.len(),
    };
    if tx.send(ready).is_err() {
        return Ok(None);
    }

    for source in &manifest.item_sources {
        let url = paths.resolve_source(source);
        let response = get(fetcher, &url, request.cache).await?;
        let file: PackFile = parse(&response, &url)?;
        let pack = Pack::from(file);
        tracing::debug!(
            generation,
            pack = %pack.id,
            items = pack.items.len(),
            "[Loader] Pack loaded"
        );
        if tx.send(LoaderEvent::PackLoaded { generation, pack }).is_err() {
            return Ok(None);
        }
    }
    Ok(Some(LoadOutcome::Complete))
}

/// Fetch `url`, mapping transport failures to [`LoadError::Transport`].
async fn get(fetcher: &dyn Fetcher, url: &str, cache: CacheMode) -> Result<FetchResponse, LoadError> {
    fetcher
        .fetch(url, cache)
        .await
        .map_err(|e| LoadError::Transport(e.to_string()))
}

/// Reject error statuses, then decode the body as `T`.
fn parse<T: serde::de::DeserializeOwned>(response: &FetchResponse, url: &str) -> Result<T, LoadError> {
    if response.is_error() {
        return Err(LoadError::Http {
            status: response.status,
            status_text: response.status_text.clone(),
        });
    }
    response
        .json()
        .map_err(|e| LoadError::Parse(format!("invalid JSON in {url}: {e}")))
}
