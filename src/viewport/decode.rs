use std::io::Read;

use serde::{Deserialize, Serialize};

use super::ElementId;

/// Failure anywhere in the fetch, decompress, parse, render pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AnimationError {
    /// Transport failure while fetching.
    #[error("fetch failed: {0}")]
    Fetch(String),
    /// Non-success response.
    #[error("{status} {status_text}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Status reason phrase.
        status_text: String,
    },
    /// Payload was not valid gzip.
    #[error("decompression failed: {0}")]
    Decompress(String),
    /// Decompressed payload was not an animation document.
    #[error("invalid animation data: {0}")]
    Parse(#[from] serde_json::Error),
    /// Renderer rejected the animation.
    #[error("render failed: {0}")]
    Render(String),
}

/// Capability that inflates a compressed animation payload.
pub trait Decompressor: Send + Sync {
    /// What: Decompress `data`.
    ///
    /// # Errors
    /// - [`AnimationError::Decompress`] when the payload is not valid.
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, AnimationError>;
}

/// Gzip decompressor used for `.tgs` payloads.
#[derive(Clone, Copy, Debug, Default)]
pub struct GzipDecompressor;

impl Decompressor for GzipDecompressor {
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, AnimationError> {
        let mut out = Vec::new();
        flate2::read::GzDecoder::new(data)
            .read_to_end(&mut out)
            .map_err(|e| AnimationError::Decompress(e.to_string()))?;
        Ok(out)
    }
}

/// Lottie animation document.
///
/// Only the header fields are typed; everything else is carried through to the
/// renderer untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationData {
    /// Format version.
    #[serde(default)]
    pub v: Option<String>,
    /// Frame rate.
    pub fr: f64,
    /// In point (first frame).
    pub ip: f64,
    /// Out point (last frame).
    pub op: f64,
    /// Canvas width.
    pub w: f64,
    /// Canvas height.
    pub h: f64,
    /// Layer definitions.
    #[serde(default)]
    pub layers: Vec<serde_json::Value>,
    /// Remaining document fields.
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

impl AnimationData {
    /// Duration in seconds, zero when the frame rate is not positive.
    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        if self.fr > 0.0 {
            (self.op - self.ip) / self.fr
        } else {
            0.0
        }
    }
}

/// Rendering backend requested from the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RendererKind {
    /// Raster canvas.
    #[default]
    Canvas,
}

/// Playback settings handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackOptions {
    /// Backend.
    pub renderer: RendererKind,
    /// Loop forever.
    pub looping: bool,
    /// Start playing once loaded.
    pub autoplay: bool,
    /// Clear the canvas between frames.
    pub clear_canvas: bool,
    /// Render frames progressively while loading.
    pub progressive_load: bool,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            renderer: RendererKind::Canvas,
            looping: true,
            autoplay: true,
            clear_canvas: true,
            progressive_load: false,
        }
    }
}

/// Host capability that plays a decoded animation inside a container element.
pub trait AnimationRenderer {
    /// What: Load and start `data` inside `container`.
    ///
    /// # Errors
    /// - [`AnimationError::Render`] when the host cannot play the animation.
    fn load_animation(
        &mut self,
        container: ElementId,
        data: &AnimationData,
        options: &PlaybackOptions,
    ) -> Result<(), AnimationError>;
}

/// What: Decompress and parse a fetched animation payload.
///
/// # Errors
/// - [`AnimationError::Decompress`] or [`AnimationError::Parse`].
pub fn decode_animation(
    decompressor: &dyn Decompressor,
    compressed: &[u8],
) -> Result<AnimationData, AnimationError> {
    let raw = decompressor.decompress(compressed)?;
    Ok(serde_json::from_slice(&raw)?)
}
