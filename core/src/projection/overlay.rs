use serde::{Deserialize, Serialize};

use crate::projection::field::{FieldCalibration, FieldGeometry, PixelOffset};
use crate::table::Coordinate;

/// Coordinate conventions seen from table backends. Which frame a backend
/// reports is not documented anywhere, so the convention is configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateConvention {
    /// Marker left/top equals coordinate x/y.
    #[default]
    Direct,
    /// Marker left/top equals dimension minus coordinate.
    Inverted,
}

/// Maps reported coordinates and raw pointer positions onto the field image.
///
/// Deterministic and clamp-free: coordinates outside the image render
/// off-canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayProjector {
    geometry: FieldGeometry,
    calibration: FieldCalibration,
    convention: CoordinateConvention,
    marker_radius: f64,
}

impl OverlayProjector {
    pub fn new(
        geometry: FieldGeometry,
        calibration: FieldCalibration,
        convention: CoordinateConvention,
        marker_radius: f64,
    ) -> Self {
        Self {
            geometry,
            calibration,
            convention,
            marker_radius,
        }
    }

    pub fn geometry(&self) -> FieldGeometry {
        self.geometry
    }

    pub fn marker_radius(&self) -> f64 {
        self.marker_radius
    }

    /// Marker-center pixel offset for a reported coordinate.
    pub fn project(&self, coordinate: Coordinate) -> PixelOffset {
        match self.convention {
            CoordinateConvention::Direct => PixelOffset::new(coordinate.x, coordinate.y),
            CoordinateConvention::Inverted => PixelOffset::new(
                self.geometry.width - coordinate.x,
                self.geometry.height - coordinate.y,
            ),
        }
    }

    /// Table-space coordinate for a raw pointer position over the image.
    ///
    /// The marker-centering offset comes off first (keeps the marker centered
    /// under the cursor), then the inverted convention maps the anchored
    /// position into table space.
    pub fn table_from_pointer(&self, left: f64, top: f64) -> Coordinate {
        let anchored_left = left - self.marker_radius;
        let anchored_top = top - self.marker_radius;
        Coordinate::new(
            self.geometry.width - anchored_left,
            self.geometry.height - anchored_top,
        )
    }

    /// Converts a field-pixel coordinate into table millimeters.
    pub fn to_millimeters(&self, coordinate: Coordinate) -> Coordinate {
        Coordinate::new(
            coordinate.x / self.geometry.width * self.calibration.length_mm,
            coordinate.y / self.geometry.height * self.calibration.width_mm,
        )
    }
}
