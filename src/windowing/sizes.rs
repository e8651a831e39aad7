use std::sync::Arc;

use crate::error::{ConfigError, Result};

/// Frame sizes offered by the window size control when no other table is supplied.
pub const DEFAULT_FRAME_SIZES: [usize; 14] = [
    4, 8, 16, 32, 64, 128, 256, 512, 1024, 2048, 4096, 8192, 16384, 32768,
];

/// The ordered set of frame sizes an engine supports.
///
/// Tables are immutable once built and cheap to clone, so several engines (or several plugins with
/// different tables) can share one without any global state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameSizeTable {
    sizes: Arc<[usize]>,
}

impl FrameSizeTable {
    /// Validates and sorts `sizes`. Every entry must be a power of two no smaller than 2.
    pub fn new(sizes: &[usize]) -> Result<Self> {
        if sizes.is_empty() {
            return Err(ConfigError::EmptySizeTable);
        }
        if let Some(&bad) = sizes.iter().find(|&&s| s < 2 || !s.is_power_of_two()) {
            return Err(ConfigError::InvalidFrameSize(bad));
        }

        let mut sorted = sizes.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        Ok(Self {
            sizes: sorted.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.sizes
    }

    pub fn contains(&self, frame_size: usize) -> bool {
        self.index_of(frame_size).is_some()
    }

    pub fn index_of(&self, frame_size: usize) -> Option<usize> {
        self.sizes.binary_search(&frame_size).ok()
    }

    /// Largest supported frame; buffers are allocated for this size.
    pub fn max(&self) -> usize {
        self.sizes[self.sizes.len() - 1]
    }

    /// Returns `frame_size` if it is supported, otherwise the error a host-facing caller reports.
    pub fn check(&self, frame_size: usize) -> Result<usize> {
        if self.contains(frame_size) {
            Ok(frame_size)
        } else {
            Err(ConfigError::UnsupportedFrameSize {
                requested: frame_size,
                supported: self.sizes.to_vec(),
            })
        }
    }

    /// Maps a normalized control value onto a table index, truncating the way the window size
    /// knob always has: `index = (value * (len - 1)) as usize`.
    pub fn index_from_normalized(&self, value: f32) -> usize {
        let value = if value.is_nan() {
            0.
        } else {
            value.clamp(0., 1.)
        };
        ((value * (self.len() - 1) as f32) as usize).min(self.len() - 1)
    }

    pub fn from_normalized(&self, value: f32) -> usize {
        self.sizes[self.index_from_normalized(value)]
    }

    /// A control value that selects `index`. Aims at the middle of the index's step so the
    /// truncating inverse never lands one entry short.
    pub fn normalized_for(&self, index: usize) -> f32 {
        if self.len() < 2 {
            return 0.;
        }
        let index = index.min(self.len() - 1);
        ((index as f32 + 0.5) / (self.len() - 1) as f32).min(1.)
    }
}

impl Default for FrameSizeTable {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_FRAME_SIZES.to_vec().into(),
        }
    }
}
