use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::projection::{CoordinateConvention, FieldCalibration, FieldGeometry, OverlayProjector};
use crate::table::DEFAULT_HARDWARE_TYPE;

/// Externalized panel settings. Every field has a shipped default, so a
/// partial YAML file (or none at all) is enough to run against a local
/// backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Table backend root, e.g. `http://127.0.0.1:5000`.
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub field: FieldGeometry,
    pub calibration: FieldCalibration,
    pub convention: CoordinateConvention,
    pub marker_radius: f64,
    pub hardware_type: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".into(),
            poll_interval_ms: 1000,
            field: FieldGeometry::default(),
            calibration: FieldCalibration::default(),
            convention: CoordinateConvention::default(),
            marker_radius: 10.0,
            hardware_type: DEFAULT_HARDWARE_TYPE.into(),
        }
    }
}

impl PanelConfig {
    /// Poll interval, floored at one millisecond.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn projector(&self) -> OverlayProjector {
        OverlayProjector::new(
            self.field,
            self.calibration,
            self.convention,
            self.marker_radius,
        )
    }
}
