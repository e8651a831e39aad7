//! Parameters are kept as the single "source of truth" for the long-term state of the plugin. As
//! used by the VST API, the parameter bank is accessible by both the audio processing thread and
//! whichever thread the host automates from, so every value lives in an atomic.
//!
//! The window size and shape controls are handed to the `ParameterBridge`: both reshape the
//! overlap state (and the window size changes the plugin's latency), so they are only recorded
//! here and committed by the host's next `suspend()`/`resume()` pair. The remaining controls only
//! affect how each frame is transformed, and reach the audio thread through cross-thread message
//! passing.

use std::sync::{
    atomic::{AtomicU32, Ordering},
    mpsc::Sender,
};

use tracing::warn;
use vst::{
    host::Host,
    plugin::{HostCallback, PluginParameters},
};

use crate::transforms::EffectKind;
use crate::windowing::{ParameterBridge, WindowShape};

pub const PARAM_WINDOW_SIZE: i32 = 0;
pub const PARAM_SHAPE: i32 = 1;
pub const PARAM_EFFECT: i32 = 2;
pub const PARAM_GATE: i32 = 3;
pub const NUM_PARAMS: usize = 4;

/// Describes a discrete operation on the frame transform.
#[derive(Clone, Debug, PartialEq)]
pub enum StateUpdate {
    SetEffect(EffectKind),
    SetGate(f32),
}

pub struct PluginState {
    host: Option<HostCallback>,
    to_dsp: Sender<StateUpdate>,
    bridge: ParameterBridge,

    /// Normalized values as last set by the host, stored as `f32` bits.
    state_record: [AtomicU32; NUM_PARAMS],
}

impl PluginState {
    pub fn new(
        host: Option<HostCallback>,
        to_dsp: Sender<StateUpdate>,
        bridge: ParameterBridge,
    ) -> Self {
        let pending = bridge.pending();
        let size_index = bridge
            .sizes()
            .index_of(pending.frame_size)
            .unwrap_or_default();
        let window_size = bridge.sizes().normalized_for(size_index);
        let shape = bridge.shapes().normalized_for(pending.shape);

        Self {
            host,
            to_dsp,
            state_record: [
                AtomicU32::new(window_size.to_bits()),
                AtomicU32::new(shape.to_bits()),
                AtomicU32::new(0f32.to_bits()),
                AtomicU32::new(0f32.to_bits()),
            ],
            bridge,
        }
    }

    pub fn bridge(&self) -> &ParameterBridge {
        &self.bridge
    }

    fn record(&self, index: i32) -> Option<f32> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.state_record.get(i))
            .map(|value| f32::from_bits(value.load(Ordering::Relaxed)))
    }

    /// Runs a bridge request, and asks the host to re-query the plugin if it left a change
    /// pending. The host will bracket the change with a `suspend()`/`resume()` pair.
    fn request(&self, apply: impl FnOnce(&ParameterBridge)) {
        let was_dirty = self.bridge.is_dirty();
        apply(&self.bridge);
        if !was_dirty && self.bridge.is_dirty() {
            if let Some(host) = &self.host {
                host.update_display();
            }
        }
    }

    fn send(&self, update: StateUpdate) {
        if self.to_dsp.send(update).is_err() {
            warn!("audio processing has shut down; dropping parameter update");
        }
    }
}

/// The DAW directly accesses the plugin state through the VST API to get reports on knob states.
impl PluginParameters for PluginState {
    fn set_parameter(&self, index: i32, value: f32) {
        let value = if value.is_nan() {
            0.
        } else {
            value.clamp(0., 1.)
        };

        match index {
            PARAM_WINDOW_SIZE => self.request(|bridge| {
                bridge.set_frame_size_normalized(value);
            }),
            PARAM_SHAPE => self.request(|bridge| {
                bridge.set_shape_normalized(value);
            }),
            PARAM_EFFECT => self.send(StateUpdate::SetEffect(EffectKind::from_normalized(value))),
            PARAM_GATE => self.send(StateUpdate::SetGate(value)),
            _ => return,
        }

        self.state_record[index as usize].store(value.to_bits(), Ordering::Relaxed);
    }

    fn get_parameter(&self, index: i32) -> f32 {
        self.record(index).unwrap_or(0.)
    }

    fn get_parameter_label(&self, index: i32) -> String {
        match index {
            PARAM_WINDOW_SIZE => "samples",
            PARAM_GATE => "%",
            _ => "",
        }
        .to_string()
    }

    fn get_parameter_text(&self, index: i32) -> String {
        let value = match self.record(index) {
            Some(value) => value,
            None => return String::new(),
        };
        match index {
            PARAM_WINDOW_SIZE => self.bridge.sizes().from_normalized(value).to_string(),
            PARAM_SHAPE => self.bridge.shapes().from_normalized(value).name().to_string(),
            PARAM_EFFECT => EffectKind::from_normalized(value).name().to_string(),
            PARAM_GATE => format!("{:.0}", value * 100.),
            _ => String::new(),
        }
    }

    fn get_parameter_name(&self, index: i32) -> String {
        match index {
            PARAM_WINDOW_SIZE => "wsize",
            PARAM_SHAPE => "shape",
            PARAM_EFFECT => "effect",
            PARAM_GATE => "gate",
            _ => "",
        }
        .to_string()
    }

    fn string_to_parameter(&self, index: i32, text: String) -> bool {
        let text = text.trim();
        let value = match index {
            PARAM_WINDOW_SIZE => text
                .parse::<usize>()
                .ok()
                .and_then(|frame_size| self.bridge.sizes().index_of(frame_size))
                .map(|i| self.bridge.sizes().normalized_for(i)),
            PARAM_SHAPE => {
                let shapes = self.bridge.shapes();
                shapes
                    .shapes()
                    .iter()
                    .copied()
                    .find(|shape: &WindowShape| shape.name().eq_ignore_ascii_case(text))
                    .map(|shape| shapes.normalized_for(shape))
            }
            PARAM_EFFECT => EffectKind::ALL
                .iter()
                .position(|kind| kind.name().eq_ignore_ascii_case(text))
                .map(|i| (i as f32 + 0.5) / EffectKind::ALL.len() as f32),
            PARAM_GATE => match text.parse::<f32>() {
                Ok(percent) if (0.0f32..=100.0).contains(&percent) => Some(percent / 100.),
                _ => None,
            },
            _ => None,
        };

        match value {
            Some(value) => {
                self.set_parameter(index, value);
                true
            }
            None => false,
        }
    }
}
