/// Per-frame processing plugged into the [`OverlapAddEngine`](super::OverlapAddEngine).
///
/// `process` sees overlapping frames of the configured size, but doesn't need to know about that.
/// Keep in mind that consecutive calls do not receive adjacent audio: every half-frame is seen
/// twice, so anything that keeps a history across frames (a delay line, say) will not behave the
/// way it would on a plain stream. Transforms that operate entirely within one frame fit best.
pub trait BlockTransform {
    /// Called whenever the engine is (re)configured, before any frame of `frame_size` samples is
    /// processed. Runs outside the audio callback, so this is the place to allocate.
    fn prepare(&mut self, _frame_size: usize) {}

    /// Fills `output` from `input`. Both slices are exactly one frame long. Must not allocate.
    fn process(&mut self, input: &[f32], output: &mut [f32]);
}

impl<F> BlockTransform for F
where
    F: FnMut(&[f32], &mut [f32]),
{
    fn process(&mut self, input: &[f32], output: &mut [f32]) {
        self(input, output)
    }
}
