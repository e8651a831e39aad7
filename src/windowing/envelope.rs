//! Crossfade envelopes for overlapping half-frames.
//!
//! Each processed frame fades in over its first half with weight `p(z)` and fades out over its
//! second half with `1 - p(z)`. The faded-out half is mixed with the next frame's faded-in half,
//! so for any shape the two weights on a given input sample sum to exactly one.

use std::f32::consts::PI;

use crate::error::{ConfigError, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WindowShape {
    /// `p = z / half`
    #[default]
    Linear,
    /// Quadratic ease-in, `p = (z / half)^2`.
    Arrow,
    /// Square-root ease, `p = sqrt(z / half)`.
    Wedge,
    /// Raised cosine, `p = (1 - cos(pi * z / half)) / 2`.
    RaisedCosine,
    /// The raised cosine, squared.
    RaisedCosineSquared,
}

impl WindowShape {
    /// Every shape, in selector order.
    pub const ALL: [WindowShape; 5] = [
        WindowShape::Linear,
        WindowShape::Arrow,
        WindowShape::Wedge,
        WindowShape::RaisedCosine,
        WindowShape::RaisedCosineSquared,
    ];

    pub fn index(self) -> usize {
        match self {
            WindowShape::Linear => 0,
            WindowShape::Arrow => 1,
            WindowShape::Wedge => 2,
            WindowShape::RaisedCosine => 3,
            WindowShape::RaisedCosineSquared => 4,
        }
    }

    /// Display name, as shown on the shape knob.
    pub fn name(self) -> &'static str {
        match self {
            WindowShape::Linear => "linear",
            WindowShape::Arrow => "arrow",
            WindowShape::Wedge => "wedge",
            WindowShape::RaisedCosine => "best",
            WindowShape::RaisedCosineSquared => "cos^2",
        }
    }

    /// Fade-in weight at position `z` of a half-frame of `half` samples.
    ///
    /// `p(0) == 0`, the curve is non-decreasing, and `p(half - 1)` approaches one as `half` grows.
    #[inline]
    pub fn weight(self, z: usize, half: usize) -> f32 {
        let x = z as f32 * (1. / half as f32);
        match self {
            WindowShape::Linear => x,
            WindowShape::Arrow => x * x,
            WindowShape::Wedge => x.sqrt(),
            WindowShape::RaisedCosine => raised_cosine(x),
            WindowShape::RaisedCosineSquared => {
                let p = raised_cosine(x);
                p * p
            }
        }
    }

    /// Fades `head` in and `tail` out. Both halves must be the same length.
    pub fn apply(self, head: &mut [f32], tail: &mut [f32]) {
        debug_assert_eq!(head.len(), tail.len());
        let half = head.len();
        for (z, (h, t)) in head.iter_mut().zip(tail.iter_mut()).enumerate() {
            let p = self.weight(z, half);
            *h *= p;
            *t *= 1. - p;
        }
    }
}

#[inline]
fn raised_cosine(x: f32) -> f32 {
    0.5 * (1. - (PI * x).cos())
}

/// The shapes a particular deployment exposes: always a prefix of [`WindowShape::ALL`].
///
/// Some plugins only offer the first few shapes. Selectors past the end clamp to the last shape in
/// the set; [`ShapeSet::get`] is available where an out-of-range index should be an error instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShapeSet {
    count: usize,
}

impl ShapeSet {
    pub const FULL: ShapeSet = ShapeSet { count: 5 };

    pub fn new(count: usize) -> Result<Self> {
        if count == 0 || count > WindowShape::ALL.len() {
            return Err(ConfigError::InvalidShapeCount(count));
        }
        Ok(Self { count })
    }

    /// Number of shapes offered, always at least one.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn shapes(&self) -> &'static [WindowShape] {
        &WindowShape::ALL[..self.count]
    }

    pub fn contains(&self, shape: WindowShape) -> bool {
        shape.index() < self.count
    }

    pub fn get(&self, index: usize) -> Result<WindowShape> {
        self.shapes()
            .get(index)
            .copied()
            .ok_or(ConfigError::ShapeOutOfRange {
                index,
                count: self.count,
            })
    }

    /// Clamping lookup.
    pub fn select(&self, index: usize) -> WindowShape {
        WindowShape::ALL[index.min(self.count - 1)]
    }

    /// Maps a normalized control value onto the set in equal-width steps.
    pub fn index_from_normalized(&self, value: f32) -> usize {
        let value = if value.is_nan() {
            0.
        } else {
            value.clamp(0., 1.)
        };
        ((value * self.count as f32) as usize).min(self.count - 1)
    }

    pub fn from_normalized(&self, value: f32) -> WindowShape {
        WindowShape::ALL[self.index_from_normalized(value)]
    }

    /// Middle of the control range that selects `shape`.
    pub fn normalized_for(&self, shape: WindowShape) -> f32 {
        let index = shape.index().min(self.count - 1);
        (index as f32 + 0.5) / self.count as f32
    }
}

impl Default for ShapeSet {
    fn default() -> Self {
        ShapeSet::FULL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_start_at_zero_and_rise() {
        for shape in WindowShape::ALL.iter().copied() {
            let half = 64;
            assert_eq!(shape.weight(0, half), 0., "{:?}", shape);
            let mut last = 0.;
            for z in 0..half {
                let p = shape.weight(z, half);
                assert!(p >= last, "{:?} decreases at {}", shape, z);
                assert!((0.0f32..=1.0).contains(&p));
                last = p;
            }
            assert!(last > 0.9, "{:?} ends at {}", shape, last);
        }
    }

    #[test]
    fn linear_weights_are_exact() {
        let weights: Vec<f32> = (0..4).map(|z| WindowShape::Linear.weight(z, 4)).collect();
        assert_eq!(weights, vec![0., 0.25, 0.5, 0.75]);
    }

    #[test]
    fn head_and_tail_weights_are_complementary() {
        for shape in WindowShape::ALL.iter().copied() {
            let mut head = vec![1.; 32];
            let mut tail = vec![1.; 32];
            shape.apply(&mut head, &mut tail);
            for (h, t) in head.iter().zip(tail.iter()) {
                assert!((h + t - 1.).abs() < 1e-6, "{:?}", shape);
            }
        }
    }

    #[test]
    fn raised_cosine_midpoint() {
        assert!((WindowShape::RaisedCosine.weight(8, 16) - 0.5).abs() < 1e-6);
        assert!((WindowShape::RaisedCosineSquared.weight(8, 16) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn shape_set_clamps_to_last_shape() {
        let set = ShapeSet::new(4).unwrap();
        assert_eq!(set.select(2), WindowShape::Wedge);
        assert_eq!(set.select(9), WindowShape::RaisedCosine);
        assert_eq!(
            set.get(4),
            Err(ConfigError::ShapeOutOfRange { index: 4, count: 4 })
        );
        assert!(!set.contains(WindowShape::RaisedCosineSquared));
    }

    #[test]
    fn shape_set_rejects_bad_counts() {
        assert_eq!(ShapeSet::new(0), Err(ConfigError::InvalidShapeCount(0)));
        assert_eq!(ShapeSet::new(6), Err(ConfigError::InvalidShapeCount(6)));
        assert_eq!(ShapeSet::new(2).map(|set| set.count()), Ok(2));
        assert_eq!(ShapeSet::default().count(), WindowShape::ALL.len());
    }

    #[test]
    fn default_shape_is_linear() {
        assert_eq!(WindowShape::default(), WindowShape::Linear);
    }

    #[test]
    fn normalized_shape_control() {
        let set = ShapeSet::FULL;
        assert_eq!(set.from_normalized(0.), WindowShape::Linear);
        assert_eq!(set.from_normalized(0.19), WindowShape::Linear);
        assert_eq!(set.from_normalized(0.2), WindowShape::Arrow);
        assert_eq!(set.from_normalized(0.79), WindowShape::RaisedCosine);
        assert_eq!(set.from_normalized(1.), WindowShape::RaisedCosineSquared);
        for shape in set.shapes().iter().copied() {
            assert_eq!(set.from_normalized(set.normalized_for(shape)), shape);
        }
    }
}
