pub mod field;
pub mod overlay;

pub use field::{FieldCalibration, FieldGeometry, PixelOffset};
pub use overlay::{CoordinateConvention, OverlayProjector};
