//! The plugin's digital signal processing is fully implemented within this module.
//!
//! Each audio channel runs through its own `OverlapAddEngine`. Transform settings are received
//! through message passing once per host block, never in the middle of one. Window size and shape
//! changes wait in the `ParameterBridge` and are only committed when the host resumes the plugin.

use std::sync::mpsc::Receiver;

use tracing::warn;
use vst::buffer::AudioBuffer;

use crate::plugin_state::StateUpdate;
use crate::transforms::{EffectKind, FrameEffect};
use crate::windowing::{EmitMode, LatencyReporter, OverlapAddEngine, ParameterBridge};

/// Handles all audio processing algorithms for the plugin.
pub(super) struct PluginDsp {
    engines: Vec<OverlapAddEngine<FrameEffect>>,

    messages_from_params: Receiver<StateUpdate>,
}

impl PluginDsp {
    pub fn new(
        incoming_messages: Receiver<StateUpdate>,
        bridge: &ParameterBridge,
        channels: usize,
    ) -> Self {
        let engines = (0..channels)
            .map(|_| {
                OverlapAddEngine::from_bridge(FrameEffect::new(EffectKind::Passthrough, 0.), bridge)
            })
            .collect();

        Self {
            engines,
            messages_from_params: incoming_messages,
        }
    }

    /// Applies any incoming state update events to the frame transforms, and then writes
    /// processed audio into the output buffer.
    pub fn process(&mut self, buffer: &mut AudioBuffer<f32>) {
        self.sync_parameters();

        let channels = self
            .engines
            .len()
            .min(buffer.input_count())
            .min(buffer.output_count());
        let (inputs, mut outputs) = buffer.split();
        for channel in 0..channels {
            self.process_channel(channel, &inputs[channel], &mut outputs[channel]);
        }
    }

    /// Picks up transform changes, which are safe to apply between blocks.
    pub fn sync_parameters(&mut self) {
        while let Ok(message) = self.messages_from_params.try_recv() {
            for engine in self.engines.iter_mut() {
                match message {
                    StateUpdate::SetEffect(kind) => engine.transform_mut().set_kind(kind),
                    StateUpdate::SetGate(threshold) => {
                        engine.transform_mut().set_gate_threshold(threshold)
                    }
                }
            }
        }
    }

    pub fn process_channel(&mut self, channel: usize, input: &[f32], output: &mut [f32]) {
        if let Some(engine) = self.engines.get_mut(channel) {
            engine.process_block(input, output, EmitMode::Replace);
        }
    }

    /// Commits whatever the bridge holds and restarts every channel from silence. Called from the
    /// host's `resume()`, outside of any audio callback.
    pub fn resume(&mut self, bridge: &ParameterBridge) {
        let pending = bridge.take_pending();
        for engine in self.engines.iter_mut() {
            if let Err(e) = engine.reconfigure(pending.frame_size, pending.shape) {
                warn!(error = %e, "keeping previous window configuration");
                engine.reset();
            }
        }
    }
}

impl LatencyReporter for PluginDsp {
    fn latency_samples(&self) -> usize {
        self.engines
            .first()
            .map_or(0, |engine| engine.latency_samples())
    }
}
