//! Tuning parameters for path generation and tracking.

use crate::error::{validate_step, PathError};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default lookahead distance, in m.
const LOOKAHEAD_DISTANCE: f64 = 0.6;

/// Default curve flattening step.
const FLATTEN_STEP: f64 = 0.05;

/// Default minimum turning radius of the vehicle, in m.
const MIN_TURNING_RADIUS: f64 = 0.5;

/// Parameters for generating and following a path.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrackingParams {
    /// How far ahead of the vehicle's projection onto the path to steer, in m.
    pub lookahead_distance: f64,
    /// The curve parameter step used when flattening control points.
    pub flatten_step: f64,
    /// The radius of the tightest turn the vehicle can make, in m.
    /// Used to size the approach turns of [`crate::Path::with_end_heading`].
    pub min_turning_radius: f64,
}

impl TrackingParams {
    /// Checks that the parameters are usable.
    pub fn validate(&self) -> Result<(), PathError> {
        validate_step(self.flatten_step)?;
        Ok(())
    }
}

impl Default for TrackingParams {
    fn default() -> Self {
        Self {
            lookahead_distance: LOOKAHEAD_DISTANCE,
            flatten_step: FLATTEN_STEP,
            min_turning_radius: MIN_TURNING_RADIUS,
        }
    }
}
