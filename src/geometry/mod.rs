//! Small geometric value types shared by the device buffers and pipeline stages.

pub mod coordinate;
pub mod dimension;

pub use self::coordinate::Coordinate;
pub use self::dimension::{Dimensions, HasDimensions};
