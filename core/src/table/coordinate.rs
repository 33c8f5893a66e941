use serde::{Deserialize, Serialize};

use crate::prelude::{BackendError, BackendResult};

/// Reported 2D position of the ball in table or camera space.
///
/// Units are whatever the backend sends; no normalization is assumed.
/// Decoding rejects non-finite values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Decodes a coordinate response body. Later backend variants serve an
    /// `{x, y}` object, earlier ones a bare `[x, y]` pair; both are accepted.
    pub fn from_json_slice(body: &[u8]) -> BackendResult<Self> {
        let payload: CoordinatePayload =
            serde_json::from_slice(body).map_err(|err| BackendError::Decode(err.to_string()))?;
        let coordinate = Coordinate::from(payload);
        if !coordinate.is_finite() {
            return Err(BackendError::Decode(
                "coordinate fields must be finite".into(),
            ));
        }
        Ok(coordinate)
    }
}

/// Wire form of a coordinate response.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CoordinatePayload {
    Object { x: f64, y: f64 },
    Pair([f64; 2]),
}

impl From<CoordinatePayload> for Coordinate {
    fn from(payload: CoordinatePayload) -> Self {
        match payload {
            CoordinatePayload::Object { x, y } => Coordinate { x, y },
            CoordinatePayload::Pair([x, y]) => Coordinate { x, y },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_object_form() {
        let coordinate = Coordinate::from_json_slice(br#"{"x": 1.0, "y": 2.0}"#).unwrap();
        assert_eq!(coordinate, Coordinate::new(1.0, 2.0));
    }

    #[test]
    fn decodes_pair_form() {
        let coordinate = Coordinate::from_json_slice(b"[340.0, 165.0]").unwrap();
        assert_eq!(coordinate, Coordinate::new(340.0, 165.0));
    }

    #[test]
    fn rejects_malformed_body() {
        let err = Coordinate::from_json_slice(b"not json").unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }

    #[test]
    fn rejects_out_of_range_numbers() {
        let err = Coordinate::from_json_slice(br#"{"x": 1e999, "y": 0.0}"#).unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }

    #[test]
    fn non_finite_values_are_flagged() {
        assert!(!Coordinate::new(f64::NAN, 0.0).is_finite());
        assert!(!Coordinate::new(0.0, f64::INFINITY).is_finite());
        assert!(Coordinate::new(340.0, 165.0).is_finite());
    }
}
