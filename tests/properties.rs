//! Property-based tests for the windowing engine.
//!
//! Checks delay, gain and buffer bookkeeping across random frame sizes, shapes and host block
//! sizes using proptest for randomized input generation.

use proptest::prelude::*;
use windowing_fx::transforms::Passthrough;
use windowing_fx::windowing::{
    EmitMode, FrameSizeTable, LatencyReporter, OverlapAddEngine, ShapeSet, WindowShape,
};

const SIZES: [usize; 6] = [4, 8, 16, 32, 64, 128];

fn engine(frame_size: usize, shape: WindowShape) -> OverlapAddEngine<Passthrough> {
    let table = FrameSizeTable::new(&SIZES).unwrap();
    OverlapAddEngine::new(Passthrough, table, frame_size, shape).unwrap()
}

fn shape_strategy() -> impl Strategy<Value = WindowShape> {
    (0usize..WindowShape::ALL.len()).prop_map(|i| WindowShape::ALL[i])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// With a passthrough transform, every sample past the first frame and a half comes out
    /// exactly one frame later, whatever the host's block size.
    #[test]
    fn passthrough_is_a_pure_delay(
        size_index in 0usize..SIZES.len(),
        shape in shape_strategy(),
        block in 1usize..97,
        input in prop::collection::vec(-1.0f32..=1.0f32, 64..1024),
    ) {
        let frame_size = SIZES[size_index];
        let mut engine = engine(frame_size, shape);

        let mut output = vec![0f32; input.len()];
        for (x, y) in input.chunks(block).zip(output.chunks_mut(block)) {
            engine.process_block(x, y, EmitMode::Replace);
        }

        for (k, &sample) in output.iter().enumerate() {
            if k < frame_size {
                prop_assert_eq!(sample, 0.);
            } else if k >= frame_size + frame_size / 2 {
                let expected = input[k - frame_size];
                prop_assert!(
                    (sample - expected).abs() < 1e-5,
                    "{:?} frame {}: output[{}] = {}, expected {}",
                    shape, frame_size, k, sample, expected
                );
            }
        }
    }

    /// The read cursor never reaches a half frame, the buffered output always covers the rest of
    /// the current half frame, and the input frame never fills up between pushes.
    #[test]
    fn buffer_bookkeeping_holds(
        size_index in 0usize..SIZES.len(),
        shape in shape_strategy(),
        input in prop::collection::vec(-1.0f32..=1.0f32, 1..512),
    ) {
        let frame_size = SIZES[size_index];
        let half = frame_size / 2;
        let mut engine = engine(frame_size, shape);

        for &x in &input {
            let y = engine.push_sample(x);
            prop_assert!(y.is_finite());
            prop_assert!(engine.output_cursor() < half);
            prop_assert!(engine.output_cursor() + engine.output_pending() >= half);
            prop_assert!(engine.input_fill() < frame_size);
        }
        prop_assert_eq!(engine.latency_samples(), frame_size);
    }

    /// Output magnitude never exceeds the largest input magnitude seen so far.
    #[test]
    fn crossfade_never_amplifies(
        size_index in 0usize..SIZES.len(),
        shape in shape_strategy(),
        input in prop::collection::vec(-1.0f32..=1.0f32, 1..512),
    ) {
        let mut engine = engine(SIZES[size_index], shape);
        let mut output = vec![0f32; input.len()];
        engine.process_block(&input, &mut output, EmitMode::Replace);

        let peak = input.iter().fold(0f32, |m, x| m.max(x.abs()));
        for &y in &output {
            prop_assert!(y.abs() <= peak + 1e-5);
        }
    }

    /// Every fade-in weight lies in [0, 1] and is complemented exactly by the fade-out.
    #[test]
    fn envelope_weights_are_bounded(shape in shape_strategy(), half in 1usize..4096, z in 0usize..4096) {
        let z = z % half;
        let p = shape.weight(z, half);
        prop_assert!((0.0f32..=1.0).contains(&p));

        let mut head = [1f32];
        let mut tail = [1f32];
        // Single-sample halves always sit at z = 0.
        shape.apply(&mut head, &mut tail);
        prop_assert!((head[0] + tail[0] - 1.).abs() < 1e-6);
    }

    /// Knob values always land on an offered frame size and shape.
    #[test]
    fn normalized_controls_stay_in_range(value in -1.0f32..2.0f32, count in 1usize..=5) {
        let sizes = FrameSizeTable::default();
        prop_assert!(sizes.contains(sizes.from_normalized(value)));

        let shapes = ShapeSet::new(count).unwrap();
        prop_assert!(shapes.contains(shapes.from_normalized(value)));
    }
}
