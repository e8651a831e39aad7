use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::windowing::BlockTransform;

/// Keeps only the strongest partials of each frame.
///
/// Every bin whose magnitude falls below `threshold` times the frame's peak magnitude is zeroed
/// before resynthesis. A threshold of zero leaves the frame as it was, up to FFT rounding.
pub struct SpectralGate {
    threshold: f32,

    forward: Option<Arc<dyn Fft<f32>>>,
    inverse: Option<Arc<dyn Fft<f32>>>,
    bins: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl SpectralGate {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.clamp(0., 1.),
            forward: None,
            inverse: None,
            bins: Vec::new(),
            scratch: Vec::new(),
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold.clamp(0., 1.);
    }
}

impl Default for SpectralGate {
    fn default() -> Self {
        Self::new(0.)
    }
}

impl BlockTransform for SpectralGate {
    fn prepare(&mut self, frame_size: usize) {
        if self.bins.len() == frame_size {
            return;
        }

        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(frame_size);
        let inverse = planner.plan_fft_inverse(frame_size);

        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());
        self.bins = vec![Complex::new(0., 0.); frame_size];
        self.scratch = vec![Complex::new(0., 0.); scratch_len];
        self.forward = Some(forward);
        self.inverse = Some(inverse);
    }

    fn process(&mut self, input: &[f32], output: &mut [f32]) {
        let (forward, inverse) = match (&self.forward, &self.inverse) {
            (Some(forward), Some(inverse)) if self.bins.len() == input.len() => (forward, inverse),
            // Not prepared for this frame size; pass the frame through untouched.
            _ => {
                output.copy_from_slice(input);
                return;
            }
        };

        for (bin, &x) in self.bins.iter_mut().zip(input.iter()) {
            *bin = Complex::new(x, 0.);
        }
        forward.process_with_scratch(&mut self.bins, &mut self.scratch);

        if self.threshold > 0. {
            let peak = self
                .bins
                .iter()
                .map(|bin| bin.norm_sqr())
                .fold(0., f32::max);
            let cut = peak * self.threshold * self.threshold;
            self.bins
                .iter_mut()
                .filter(|bin| bin.norm_sqr() < cut)
                .for_each(|bin| *bin = Complex::new(0., 0.));
        }

        inverse.process_with_scratch(&mut self.bins, &mut self.scratch);

        let scale = 1. / input.len() as f32;
        for (y, bin) in output.iter_mut().zip(self.bins.iter()) {
            *y = bin.re * scale;
        }
    }
}
