//! The overlap-add frame processor.
//!
//! Reads samples (logically) one at a time from the host and copies them into an input frame.
//! Simultaneously it hands out samples from the front of the output buffer. The output buffer
//! always holds enough processed samples to cover the delay of input processing, so host demand
//! can always be met.
//!
//! Whenever the input frame is full:
//!  - the transform processes it into a scratch frame,
//!  - the first half is faded in and the second half faded out,
//!  - the faded-out tail of the previous frame is mixed into the first half,
//!  - that first half becomes available output,
//!  - the second half is kept as the tail for the next frame,
//!  - the second half of the input frame slides to the front, so every half-frame of input is
//!    processed twice.
//!
//! Whenever a half-frame has been read out of the output buffer, the rest slides back to the front.

use tracing::debug;

use super::{
    BlockTransform, FrameBuffer, FrameSizeTable, ParameterBridge, WindowShape, WindowingConfig,
};
use crate::error::Result;

/// Whether processed samples overwrite the host's output or are summed into it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmitMode {
    Replace,
    Accumulate,
}

pub struct OverlapAddEngine<T> {
    transform: T,
    sizes: FrameSizeTable,

    frame_size: usize,
    half: usize,
    shape: WindowShape,

    /// Incoming frame. Only the first `input_fill` samples are valid.
    input: Vec<f32>,
    input_fill: usize,

    /// Transform output for the frame currently being windowed.
    frame: Vec<f32>,

    output: FrameBuffer,

    /// Faded-out second half of the previous frame, mixed into the head of the next one.
    carry: Vec<f32>,
}

impl<T: BlockTransform> OverlapAddEngine<T> {
    /// Builds an engine whose buffers can hold the largest frame in `sizes`, configured for
    /// `frame_size`.
    pub fn new(
        transform: T,
        sizes: FrameSizeTable,
        frame_size: usize,
        shape: WindowShape,
    ) -> Result<Self> {
        sizes.check(frame_size)?;
        Ok(Self::build(transform, sizes, frame_size, shape))
    }

    pub fn from_config(transform: T, config: &WindowingConfig) -> Result<Self> {
        config.validate()?;
        Self::new(
            transform,
            config.sizes.clone(),
            config.frame_size,
            config.shape,
        )
    }

    /// Builds an engine for the bridge's committed configuration. Pending requests stay pending
    /// until the next `resume`. The bridge only ever holds sizes from its own table, so this
    /// cannot fail.
    pub fn from_bridge(transform: T, bridge: &ParameterBridge) -> Self {
        Self::build(
            transform,
            bridge.sizes().clone(),
            bridge.frame_size(),
            bridge.shape(),
        )
    }

    fn build(transform: T, sizes: FrameSizeTable, frame_size: usize, shape: WindowShape) -> Self {
        debug_assert!(sizes.contains(frame_size));
        let max_frame = sizes.max();

        let mut engine = Self {
            transform,
            sizes,
            frame_size,
            half: frame_size / 2,
            shape,
            input: vec![0.; max_frame],
            input_fill: 0,
            frame: vec![0.; max_frame],
            output: FrameBuffer::with_capacity(max_frame * 2),
            carry: vec![0.; max_frame / 2],
        };
        engine.reset();
        engine
    }

    /// Switches to a new frame size and shape, discarding everything in flight.
    ///
    /// Only call this at a host reconfiguration boundary (`resume`), never between samples of a
    /// block: the frame size changes the reported latency, and a resize would corrupt in-flight
    /// overlap state. The shape is only ever changed here too, since a carried tail faded out with
    /// one curve doesn't sum to unity with a head faded in by another.
    pub fn reconfigure(&mut self, frame_size: usize, shape: WindowShape) -> Result<()> {
        self.sizes.check(frame_size)?;
        self.frame_size = frame_size;
        self.half = frame_size / 2;
        self.shape = shape;
        self.reset();
        debug!(frame_size, shape = shape.name(), "windowing engine reconfigured");
        Ok(())
    }

    /// Clears all buffers. The tail and the first frame of output are always zeros; input starts
    /// at the beginning of a frame.
    pub fn reset(&mut self) {
        self.input.iter_mut().for_each(|sample| *sample = 0.);
        self.input_fill = 0;
        self.carry.iter_mut().for_each(|sample| *sample = 0.);
        self.output.reset(self.frame_size);
        self.transform.prepare(self.frame_size);
    }

    /// Feeds one input sample and returns one output sample, `frame_size` samples later.
    #[inline]
    pub fn push_sample(&mut self, sample: f32) -> f32 {
        debug_assert!(self.input_fill < self.frame_size, "input frame overflow");
        self.input[self.input_fill] = sample;
        self.input_fill += 1;

        if self.input_fill == self.frame_size {
            self.process_frame();
        }

        let out = self.output.pop_front();
        self.compact_at_half_frame();
        out
    }

    /// Runs one host block through the engine. Processes as many samples as both slices hold.
    pub fn process_block(&mut self, input: &[f32], output: &mut [f32], mode: EmitMode) {
        match mode {
            EmitMode::Replace => {
                for (x, y) in input.iter().zip(output.iter_mut()) {
                    *y = self.push_sample(*x);
                }
            }
            EmitMode::Accumulate => {
                for (x, y) in input.iter().zip(output.iter_mut()) {
                    *y += self.push_sample(*x);
                }
            }
        }
    }

    fn process_frame(&mut self) {
        let frame_size = self.frame_size;
        let half = self.half;

        let frame = &mut self.frame[..frame_size];
        self.transform.process(&self.input[..frame_size], frame);

        let (head, tail) = frame.split_at_mut(half);
        self.shape.apply(head, tail);

        let carry = &mut self.carry[..half];
        head.iter_mut()
            .zip(carry.iter())
            .for_each(|(h, c)| *h += *c);
        carry.copy_from_slice(tail);

        self.output.append(head);

        // The second half of this input frame is the first half of the next.
        self.input.copy_within(half..frame_size, 0);
        self.input_fill = half;
    }

    /// Keeps room for a whole frame behind the read cursor.
    #[inline]
    fn compact_at_half_frame(&mut self) {
        if self.output.start() == self.half {
            self.output.compact();
        }
    }
}

impl<T> OverlapAddEngine<T> {
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn half_frame(&self) -> usize {
        self.half
    }

    pub fn shape(&self) -> WindowShape {
        self.shape
    }

    /// Samples collected toward the next frame.
    pub fn input_fill(&self) -> usize {
        self.input_fill
    }

    /// Read position in the output buffer.
    pub fn output_cursor(&self) -> usize {
        self.output.start()
    }

    /// Processed samples not yet handed to the host.
    pub fn output_pending(&self) -> usize {
        self.output.len()
    }

    pub fn transform(&self) -> &T {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut T {
        &mut self.transform
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Identity = fn(&[f32], &mut [f32]);

    fn identity(input: &[f32], output: &mut [f32]) {
        output.copy_from_slice(input);
    }

    fn engine(frame_size: usize, shape: WindowShape) -> OverlapAddEngine<Identity> {
        OverlapAddEngine::new(identity as Identity, FrameSizeTable::default(), frame_size, shape)
            .unwrap()
    }

    #[test]
    fn rejects_unsupported_frame_size() {
        let table = FrameSizeTable::new(&[8, 16]).unwrap();
        assert!(
            OverlapAddEngine::new(identity as Identity, table.clone(), 32, WindowShape::Linear)
                .is_err()
        );

        let mut engine =
            OverlapAddEngine::new(identity as Identity, table, 8, WindowShape::Linear).unwrap();
        assert!(engine.reconfigure(12, WindowShape::Linear).is_err());
        assert_eq!(engine.frame_size(), 8);
    }

    #[test]
    fn fresh_engine_queues_one_frame_of_silence() {
        let engine = engine(16, WindowShape::Linear);
        assert_eq!(engine.half_frame(), 8);
        assert_eq!(engine.input_fill(), 0);
        assert_eq!(engine.output_cursor(), 0);
        assert_eq!(engine.output_pending(), 16);
    }

    #[test]
    fn input_is_half_full_after_each_frame() {
        let mut engine = engine(8, WindowShape::Linear);
        for _ in 0..8 {
            engine.push_sample(1.);
        }
        assert_eq!(engine.input_fill(), 4);
        for _ in 0..4 {
            engine.push_sample(1.);
        }
        assert_eq!(engine.input_fill(), 4);
    }

    #[test]
    fn accumulate_adds_into_output() {
        let input: Vec<f32> = (1..=16).map(|x| x as f32).collect();

        let mut replaced = vec![0.; 16];
        engine(8, WindowShape::Linear).process_block(&input, &mut replaced, EmitMode::Replace);

        let mut accumulated = vec![1.; 16];
        engine(8, WindowShape::Linear).process_block(
            &input,
            &mut accumulated,
            EmitMode::Accumulate,
        );

        for (r, a) in replaced.iter().zip(accumulated.iter()) {
            assert_eq!(*a, r + 1.);
        }
    }

    #[test]
    fn process_block_stops_at_shorter_slice() {
        let mut engine = engine(8, WindowShape::Linear);
        let mut output = vec![5.; 3];
        engine.process_block(&[1.; 10], &mut output, EmitMode::Replace);
        assert_eq!(output, vec![0.; 3]);
        assert_eq!(engine.input_fill(), 3);
    }

    #[test]
    fn transform_is_prepared_on_reconfigure() {
        struct Recorder(Vec<usize>);
        impl BlockTransform for Recorder {
            fn prepare(&mut self, frame_size: usize) {
                self.0.push(frame_size);
            }
            fn process(&mut self, input: &[f32], output: &mut [f32]) {
                output.copy_from_slice(input);
            }
        }

        let mut engine = OverlapAddEngine::new(
            Recorder(Vec::new()),
            FrameSizeTable::default(),
            32,
            WindowShape::Arrow,
        )
        .unwrap();
        engine.reconfigure(64, WindowShape::Wedge).unwrap();
        engine.reset();
        assert_eq!(engine.transform().0, vec![32, 64, 64]);
        assert_eq!(engine.shape(), WindowShape::Wedge);
    }

    #[test]
    fn transform_sees_overlapping_frames() {
        let mut frames: Vec<Vec<f32>> = Vec::new();
        {
            let mut engine = OverlapAddEngine::new(
                |input: &[f32], output: &mut [f32]| {
                    frames.push(input.to_vec());
                    output.copy_from_slice(input);
                },
                FrameSizeTable::default(),
                4,
                WindowShape::Linear,
            )
            .unwrap();
            for x in 0..8 {
                engine.push_sample(x as f32);
            }
        }
        assert_eq!(
            frames,
            vec![vec![0., 1., 2., 3.], vec![2., 3., 4., 5.], vec![4., 5., 6., 7.]]
        );
    }
}
