use super::{FrameSizeTable, ShapeSet, WindowShape};
use crate::error::{ConfigError, Result};

/// Everything needed to build an engine or a parameter bridge for one deployment.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowingConfig {
    pub sizes: FrameSizeTable,
    pub shapes: ShapeSet,
    pub frame_size: usize,
    pub shape: WindowShape,
}

impl WindowingConfig {
    /// Checks that the starting frame size and shape are offered by this deployment.
    pub fn validate(&self) -> Result<()> {
        self.sizes.check(self.frame_size)?;
        if !self.shapes.contains(self.shape) {
            return Err(ConfigError::ShapeOutOfRange {
                index: self.shape.index(),
                count: self.shapes.count(),
            });
        }
        Ok(())
    }
}

/// The window size knob starts in the middle of the default table, with linear crossfades.
impl Default for WindowingConfig {
    fn default() -> Self {
        let sizes = FrameSizeTable::default();
        let frame_size = sizes.from_normalized(0.5);
        Self {
            sizes,
            shapes: ShapeSet::default(),
            frame_size,
            shape: WindowShape::Linear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = WindowingConfig::default();
        assert_eq!(config.frame_size, 256);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_missing_size_and_shape() {
        let mut config = WindowingConfig {
            sizes: FrameSizeTable::new(&[8, 16]).unwrap(),
            shapes: ShapeSet::new(2).unwrap(),
            frame_size: 32,
            shape: WindowShape::Linear,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnsupportedFrameSize { requested: 32, .. })
        ));

        config.frame_size = 16;
        config.shape = WindowShape::Wedge;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ShapeOutOfRange { index: 2, count: 2 })
        );
    }
}
