//! windowing-fx is a VST2 plugin built around a reusable overlap-add windowing system.
//!
//! The host's per-sample stream is cut into fixed-size, half-overlapping frames. Each frame is run
//! through a pluggable transform, and the results are crossfaded back together with a selectable
//! envelope. The plugin reports exactly one frame of latency (and the same amount of tail) to the
//! host.
//!
//! The windowing system itself lives in [`windowing`] and has no VST dependencies; everything in
//! this file is host glue.

use std::sync::{mpsc::channel, Arc};

use tracing::info;
use vst::{
    api::Supported,
    buffer::AudioBuffer,
    plugin::{CanDo, Category, HostCallback, Info, Plugin, PluginParameters},
};

pub mod error;
pub mod transforms;
pub mod windowing;

mod dsp;
use dsp::PluginDsp;

mod plugin_state;
use plugin_state::{PluginState, NUM_PARAMS};

use windowing::{LatencyReporter, ParameterBridge};

/// Audio channels in and out. Each gets its own windowing engine.
const NUM_CHANNELS: usize = 2;

/// Top level wrapper that exposes a full `vst::Plugin` implementation.
struct WindowingVst {
    /// The `PluginDsp` handles all of the plugin's audio processing, and is only accessed from the
    /// audio processing thread (and from `resume`, which the host never overlaps with
    /// processing).
    dsp: PluginDsp,

    /// The `PluginState` holds the long-term state of the plugin and distributes raw parameter
    /// updates as they occur to other parts of the plugin. It is shared between the audio
    /// processing thread and the host's parameter thread, and updated using atomics.
    state_handle: Arc<PluginState>,
}

impl WindowingVst {
    /// Initializes the VST plugin, along with an optional `HostCallback` handle.
    fn new_maybe_host(maybe_host: Option<HostCallback>) -> Self {
        let (to_dsp, dsp_recv) = channel();

        let bridge = ParameterBridge::default();
        let dsp = PluginDsp::new(dsp_recv, &bridge, NUM_CHANNELS);
        info!(
            frame_size = dsp.latency_samples(),
            "windowing plugin initialized"
        );

        let state_handle = Arc::new(PluginState::new(maybe_host, to_dsp, bridge));

        Self { dsp, state_handle }
    }
}

/// `vst::plugin_main` requires a `Default` implementation.
impl Default for WindowingVst {
    fn default() -> Self {
        Self::new_maybe_host(None)
    }
}

/// Main `vst` plugin implementation.
impl Plugin for WindowingVst {
    fn new(host: HostCallback) -> Self {
        Self::new_maybe_host(Some(host))
    }

    fn get_info(&self) -> Info {
        /// Use a hash of a string describing this plugin to avoid unique ID conflicts.
        const UNIQUE_ID_SEED: &str = "windowing-fx Overlap-Add Windowing VST2 Plugin";
        static UNIQUE_ID: once_cell::sync::Lazy<i32> = once_cell::sync::Lazy::new(|| {
            use std::collections::hash_map::DefaultHasher;
            use std::hash::{Hash, Hasher};

            let mut s = DefaultHasher::new();
            UNIQUE_ID_SEED.hash(&mut s);
            s.finish() as i32
        });

        Info {
            name: "windowing-fx".to_string(),
            vendor: "antonok".to_string(),
            unique_id: *UNIQUE_ID,
            category: Category::Effect,
            inputs: NUM_CHANNELS as i32,
            outputs: NUM_CHANNELS as i32,
            parameters: NUM_PARAMS as i32,
            initial_delay: self.dsp.latency_samples() as i32,
            ..Info::default()
        }
    }

    fn process(&mut self, buffer: &mut AudioBuffer<f32>) {
        self.dsp.process(buffer);
    }

    /// Nothing to do here; all reinitialization happens in `resume`.
    fn suspend(&mut self) {}

    /// Commits any pending window size and shape change. The host re-reads the delay and tail
    /// afterwards.
    fn resume(&mut self) {
        self.dsp.resume(self.state_handle.bridge());
    }

    /// Tail is the same as the delay, of course.
    fn get_tail_size(&self) -> isize {
        self.dsp.tail_samples() as isize
    }

    fn can_do(&self, _can_do: CanDo) -> Supported {
        Supported::Maybe
    }

    fn get_parameter_object(&mut self) -> Arc<dyn PluginParameters> {
        Arc::clone(&self.state_handle) as Arc<dyn PluginParameters>
    }
}

vst::plugin_main!(WindowingVst);
