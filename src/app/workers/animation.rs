use std::sync::Arc;

use tokio::sync::mpsc;

use crate::sources::{CacheMode, Fetcher};
use crate::viewport::{
    AnimationData, AnimationError, AnimationJob, Decompressor, ElementId, decode_animation,
};

/// Result of one animation pipeline run.
#[derive(Debug)]
pub struct AnimationReady {
    /// Container element the job was started for.
    pub element: ElementId,
    /// Asset location, kept for logging.
    pub url: String,
    /// Decoded animation or the first failure.
    pub result: Result<AnimationData, AnimationError>,
}

/// What: Spawn the fetch, decompress, parse pipeline for one element.
///
/// Inputs:
/// - `fetcher`: Fetch capability.
/// - `decompressor`: Gzip (or other) decompression capability.
/// - `job`: Element and asset location.
/// - `tx`: Channel receiving the outcome.
///
/// Details:
/// - The outcome is sent even on failure so the element's status can settle.
pub fn spawn_animation_job(
    fetcher: Arc<dyn Fetcher>,
    decompressor: Arc<dyn Decompressor>,
    job: AnimationJob,
    tx: mpsc::UnboundedSender<AnimationReady>,
) {
    tokio::spawn(async move {
        let ready = run_animation_job(fetcher.as_ref(), decompressor.as_ref(), job).await;
        let _ = tx.send(ready);
    });
}

/// What: Run the pipeline for one element.
///
/// Output:
/// - [`AnimationReady`] carrying the parsed animation or the failure.
pub async fn run_animation_job(
    fetcher: &dyn Fetcher,
    decompressor: &dyn Decompressor,
    job: AnimationJob,
) -> AnimationReady {
    let result = fetch_and_decode(fetcher, decompressor, &job.url).await;
    AnimationReady {
        element: job.element,
        url: job.url,
        result,
    }
}

async fn fetch_and_decode(
    fetcher: &dyn Fetcher,
    decompressor: &dyn Decompressor,
    url: &str,
) -> Result<AnimationData, AnimationError> {
    let response = fetcher
        .fetch(url, CacheMode::Default)
        .await
        .map_err(|e| AnimationError::Fetch(e.to_string()))?;
    if response.is_error() {
        return Err(AnimationError::Http {
            status: response.status,
            status_text: response.status_text,
        });
    }
    decode_animation(decompressor, &response.body)
}
