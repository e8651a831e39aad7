//! Configuration errors.
//!
//! The windowing engine itself cannot fail while streaming: every buffer is sized for the largest
//! supported frame up front. The only errors are bad configuration requests, which are rejected at
//! the parameter boundary before they ever reach the audio thread.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A frame size table needs at least one entry.
    #[error("frame size table is empty")]
    EmptySizeTable,

    /// Frame sizes must be powers of two, and at least 2 so that a half-frame exists.
    #[error("invalid frame size {0}: must be a power of two no smaller than 2")]
    InvalidFrameSize(usize),

    /// The requested frame size is not one of the sizes this engine was built for.
    #[error("unsupported frame size {requested} (supported: {supported:?})")]
    UnsupportedFrameSize {
        requested: usize,
        supported: Vec<usize>,
    },

    /// Strict shape lookup past the end of a deployment's shape set.
    #[error("window shape index {index} out of range for {count} shapes")]
    ShapeOutOfRange { index: usize, count: usize },

    /// A deployment can expose between one and all five window shapes.
    #[error("invalid window shape count {0}")]
    InvalidShapeCount(usize),
}
