// crates/beamsim-core/src/physics/rolling.rs

use crate::physics::state::{EndStop, Kinematics};

/// Effective inertia fraction of a solid sphere rolling without slip.
pub const ROLLING_FACTOR: f64 = 5.0 / 7.0;

/// Ball acceleration along the beam (m/s^2).
///
/// The position axis grows against the positive rotation sense, hence the
/// negated angle.
#[inline]
pub fn acceleration(angle_deg: f64, gravity: f64) -> f64 {
    (5.0 * gravity * (-angle_deg * std::f64::consts::PI / 180.0).sin()) / 7.0
}

/// Result of one integration step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    pub kin: Kinematics,
    pub acceleration: f64,
    pub end_stop: Option<EndStop>,
}

/// Advance `k` by `dt` seconds at a fixed angle.
///
/// Velocity is in m/s and position in mm; the 1000/500 factors bridge the two.
/// Hitting either end of `-limit_mm..=limit_mm` clamps and kills velocity.
pub fn tick(k: Kinematics, angle_deg: f64, gravity: f64, dt: f64, limit_mm: f64) -> Step {
    let a = acceleration(angle_deg, gravity);
    let mut velocity = k.velocity + a * dt;
    let unbounded = k.position_mm + 1000.0 * velocity * dt + 500.0 * a * dt * dt;

    let (position_mm, end_stop) = if unbounded > limit_mm {
        velocity = 0.0;
        (limit_mm, Some(EndStop::Upper))
    } else if unbounded < -limit_mm {
        velocity = 0.0;
        (-limit_mm, Some(EndStop::Lower))
    } else {
        (unbounded, None)
    };

    Step {
        kin: Kinematics {
            position_mm,
            velocity,
        },
        acceleration: a,
        end_stop,
    }
}
