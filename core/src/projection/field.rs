use serde::{Deserialize, Serialize};

/// Fixed rendering size of the field image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldGeometry {
    pub width: f64,
    pub height: f64,
}

impl Default for FieldGeometry {
    fn default() -> Self {
        Self {
            width: 680.0,
            height: 330.0,
        }
    }
}

/// Measured playing-field dimensions, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldCalibration {
    pub length_mm: f64,
    pub width_mm: f64,
}

impl Default for FieldCalibration {
    fn default() -> Self {
        Self {
            length_mm: 1170.0,
            width_mm: 630.0,
        }
    }
}

/// Marker-center offset within the field image.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelOffset {
    pub left: f64,
    pub top: f64,
}

impl PixelOffset {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}
