// crates/beamsim-core/src/physics/angle.rs

use crate::error::{BeamError, Result};

/// Beam inclination in degrees, checked against a limit at construction.
///
/// Positive angles roll the ball toward negative positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct BeamAngle(f64);

impl BeamAngle {
    pub const ZERO: BeamAngle = BeamAngle(0.0);

    /// Accepts `-limit_deg..=limit_deg`; anything else (NaN included) is rejected.
    pub fn new(degrees: f64, limit_deg: f64) -> Result<BeamAngle> {
        if degrees.is_finite() && degrees.abs() <= limit_deg {
            Ok(BeamAngle(degrees))
        } else {
            Err(BeamError::AngleOutOfRange {
                angle_deg: degrees,
                limit_deg,
            })
        }
    }

    #[inline]
    pub fn degrees(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn radians(self) -> f64 {
        self.0.to_radians()
    }
}
