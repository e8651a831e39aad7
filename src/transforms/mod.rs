//! Frame transforms for the windowing engine, plus the selector the plugin exposes as its
//! "effect" control.

mod spectral;
pub use spectral::SpectralGate;

use crate::windowing::BlockTransform;

/// Copies each frame unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct Passthrough;

impl BlockTransform for Passthrough {
    fn process(&mut self, input: &[f32], output: &mut [f32]) {
        output.copy_from_slice(input);
    }
}

/// Plays each frame backwards.
#[derive(Clone, Copy, Debug, Default)]
pub struct Reverse;

impl BlockTransform for Reverse {
    fn process(&mut self, input: &[f32], output: &mut [f32]) {
        for (y, x) in output.iter_mut().zip(input.iter().rev()) {
            *y = *x;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    Passthrough,
    Reverse,
    SpectralGate,
}

impl EffectKind {
    pub const ALL: [EffectKind; 3] = [
        EffectKind::Passthrough,
        EffectKind::Reverse,
        EffectKind::SpectralGate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EffectKind::Passthrough => "passthrough",
            EffectKind::Reverse => "reverse",
            EffectKind::SpectralGate => "spectral gate",
        }
    }

    pub fn from_normalized(value: f32) -> Self {
        let value = if value.is_nan() {
            0.
        } else {
            value.clamp(0., 1.)
        };
        let index = ((value * Self::ALL.len() as f32) as usize).min(Self::ALL.len() - 1);
        Self::ALL[index]
    }
}

/// Every transform the plugin offers, kept prepared at once so that switching between them on the
/// audio thread never allocates.
pub struct FrameEffect {
    kind: EffectKind,
    spectral: SpectralGate,
}

impl FrameEffect {
    pub fn new(kind: EffectKind, gate_threshold: f32) -> Self {
        Self {
            kind,
            spectral: SpectralGate::new(gate_threshold),
        }
    }

    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: EffectKind) {
        self.kind = kind;
    }

    pub fn set_gate_threshold(&mut self, threshold: f32) {
        self.spectral.set_threshold(threshold);
    }

    pub fn gate_threshold(&self) -> f32 {
        self.spectral.threshold()
    }
}

impl BlockTransform for FrameEffect {
    fn prepare(&mut self, frame_size: usize) {
        self.spectral.prepare(frame_size);
    }

    fn process(&mut self, input: &[f32], output: &mut [f32]) {
        match self.kind {
            EffectKind::Passthrough => Passthrough.process(input, output),
            EffectKind::Reverse => Reverse.process(input, output),
            EffectKind::SpectralGate => self.spectral.process(input, output),
        }
    }
}
