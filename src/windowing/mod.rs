//! The windowing system: turns a per-sample host stream into overlapping fixed-size frames, runs a
//! [`BlockTransform`] on each frame, and crossfades the results back into a stream with a latency
//! of exactly one frame.
//!
//! Nothing in this module knows about VST. The plugin wrapper drives an [`OverlapAddEngine`] per
//! channel, configures it through a [`ParameterBridge`] and reports its delay through
//! [`LatencyReporter`].

mod bridge;
mod config;
mod engine;
mod envelope;
mod frame_buffer;
mod latency;
mod sizes;
mod transform;

pub use bridge::{ParameterBridge, PendingConfig};
pub use config::WindowingConfig;
pub use engine::{EmitMode, OverlapAddEngine};
pub use envelope::{ShapeSet, WindowShape};
pub use frame_buffer::FrameBuffer;
pub use latency::LatencyReporter;
pub use sizes::{FrameSizeTable, DEFAULT_FRAME_SIZES};
pub use transform::BlockTransform;
