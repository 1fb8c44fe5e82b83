// crates/beamsim-core/src/physics/state.rs

use std::time::Instant;

use crate::physics::angle::BeamAngle;
use crate::physics::location::Location;

/// Position (mm) and velocity (m/s) along the beam.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Kinematics {
    pub position_mm: f64,
    pub velocity: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndStop {
    Lower,
    Upper,
}

/// Full plant state as last computed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicalState {
    pub kin: Kinematics,
    /// Derived on every fast-forward (m/s^2).
    pub acceleration: f64,
    pub angle: BeamAngle,
    pub location: Location,
    pub last_event: Instant,
}

impl PhysicalState {
    pub fn at_rest(position_mm: f64, location: Location, now: Instant) -> Self {
        Self {
            kin: Kinematics {
                position_mm,
                velocity: 0.0,
            },
            acceleration: 0.0,
            angle: BeamAngle::ZERO,
            location,
            last_event: now,
        }
    }

    #[inline]
    pub fn position_mm(&self) -> f64 {
        self.kin.position_mm
    }

    #[inline]
    pub fn velocity(&self) -> f64 {
        self.kin.velocity
    }
}
