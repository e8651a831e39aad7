//! Hands window size and shape changes from the control thread to the audio thread.
//!
//! Neither is applied right away. Changing the window size changes the plugin's latency, which
//! the host has to be told about, and resizing mid-stream would corrupt the overlap state. Changing
//! the shape mid-stream is just as bad in a quieter way: the carried tail was faded out with the
//! old curve and the next head would be faded in with the new one, so the two no longer sum to
//! unity for a half-frame. So the control side only records the request and raises a flag; the
//! audio side picks both values up together at the next `resume()`, where the host already
//! expects everything to be reinitialized.
//!
//! Everything here is a single atomic word: no locks, no allocation, safe to touch from the audio
//! thread.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tracing::{debug, warn};

use super::{FrameSizeTable, ShapeSet, WindowShape, WindowingConfig};
use crate::error::{ConfigError, Result};

/// A reconfiguration the audio thread should apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingConfig {
    pub frame_size: usize,
    pub shape: WindowShape,
    /// Whether anything was requested since the last commit.
    pub changed: bool,
}

pub struct ParameterBridge {
    sizes: FrameSizeTable,
    shapes: ShapeSet,

    /// Most recent requests.
    requested_frame_size: AtomicUsize,
    requested_shape: AtomicUsize,
    dirty: AtomicBool,

    /// What the last `take_pending` handed to the audio thread.
    frame_size: AtomicUsize,
    shape: AtomicUsize,
}

impl ParameterBridge {
    pub fn new(
        sizes: FrameSizeTable,
        shapes: ShapeSet,
        frame_size: usize,
        shape: WindowShape,
    ) -> Result<Self> {
        sizes.check(frame_size)?;
        let shape = shapes.get(shape.index())?;
        Ok(Self::build(sizes, shapes, frame_size, shape))
    }

    pub fn from_config(config: &WindowingConfig) -> Result<Self> {
        Self::new(
            config.sizes.clone(),
            config.shapes,
            config.frame_size,
            config.shape,
        )
    }

    fn build(
        sizes: FrameSizeTable,
        shapes: ShapeSet,
        frame_size: usize,
        shape: WindowShape,
    ) -> Self {
        Self {
            sizes,
            shapes,
            requested_frame_size: AtomicUsize::new(frame_size),
            requested_shape: AtomicUsize::new(shape.index()),
            dirty: AtomicBool::new(false),
            frame_size: AtomicUsize::new(frame_size),
            shape: AtomicUsize::new(shape.index()),
        }
    }

    pub fn sizes(&self) -> &FrameSizeTable {
        &self.sizes
    }

    pub fn shapes(&self) -> ShapeSet {
        self.shapes
    }

    /// Records a new frame size for the next commit. Unsupported sizes are rejected here so they
    /// never reach the engine.
    pub fn request_frame_size(&self, frame_size: usize) -> Result<()> {
        if let Err(e) = self.sizes.check(frame_size) {
            warn!(frame_size, "rejecting unsupported window size");
            return Err(e);
        }
        self.store_frame_size(frame_size);
        Ok(())
    }

    /// Maps a window size knob value onto the table and records it. Returns the selected size.
    pub fn set_frame_size_normalized(&self, value: f32) -> usize {
        let frame_size = self.sizes.from_normalized(value);
        self.store_frame_size(frame_size);
        frame_size
    }

    /// Records a crossfade shape for the next commit, clamping past-the-end selectors to the
    /// deployment's last shape.
    pub fn request_shape(&self, index: usize) -> WindowShape {
        let shape = self.shapes.select(index);
        if shape.index() != index {
            debug!(index, clamped = shape.name(), "window shape selector clamped");
        }
        self.store_shape(shape);
        shape
    }

    pub fn set_shape_normalized(&self, value: f32) -> WindowShape {
        let shape = self.shapes.from_normalized(value);
        self.store_shape(shape);
        shape
    }

    /// Strict variant for programmatic callers: both values must be offered by this deployment.
    /// Nothing is recorded unless both are.
    pub fn request_reconfigure(&self, frame_size: usize, shape: WindowShape) -> Result<()> {
        if !self.shapes.contains(shape) {
            warn!(shape = shape.name(), "rejecting unsupported window shape");
            return Err(ConfigError::ShapeOutOfRange {
                index: shape.index(),
                count: self.shapes.count(),
            });
        }
        self.request_frame_size(frame_size)?;
        self.store_shape(shape);
        Ok(())
    }

    /// Whether a change is waiting for the next commit.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Frame size as of the last commit.
    pub fn frame_size(&self) -> usize {
        self.frame_size.load(Ordering::Acquire)
    }

    /// Shape as of the last commit.
    pub fn shape(&self) -> WindowShape {
        self.shapes.select(self.shape.load(Ordering::Acquire))
    }

    /// Looks at the configuration the next commit would apply, without consuming it.
    pub fn pending(&self) -> PendingConfig {
        PendingConfig {
            frame_size: self.requested_frame_size.load(Ordering::Acquire),
            shape: self
                .shapes
                .select(self.requested_shape.load(Ordering::Acquire)),
            changed: self.is_dirty(),
        }
    }

    /// Consumes the pending configuration. Only call this at the host's resume checkpoint.
    pub fn take_pending(&self) -> PendingConfig {
        let changed = self.dirty.swap(false, Ordering::AcqRel);
        let pending = PendingConfig {
            changed,
            ..self.pending()
        };

        self.frame_size.store(pending.frame_size, Ordering::Release);
        self.shape.store(pending.shape.index(), Ordering::Release);
        if changed {
            debug!(
                frame_size = pending.frame_size,
                shape = pending.shape.name(),
                "committing window change"
            );
        }
        pending
    }

    fn store_frame_size(&self, frame_size: usize) {
        debug_assert!(self.sizes.contains(frame_size));
        let previous = self.requested_frame_size.swap(frame_size, Ordering::AcqRel);
        if previous != frame_size {
            self.dirty.store(true, Ordering::Release);
            debug!(frame_size, "window size change pending until resume");
        }
    }

    fn store_shape(&self, shape: WindowShape) {
        let previous = self.requested_shape.swap(shape.index(), Ordering::AcqRel);
        if previous != shape.index() {
            self.dirty.store(true, Ordering::Release);
            debug!(shape = shape.name(), "window shape change pending until resume");
        }
    }
}

/// Built from [`WindowingConfig::default`], which is always valid.
impl Default for ParameterBridge {
    fn default() -> Self {
        let config = WindowingConfig::default();
        Self::build(config.sizes, config.shapes, config.frame_size, config.shape)
    }
}
