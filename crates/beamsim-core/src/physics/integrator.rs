// crates/beamsim-core/src/physics/integrator.rs

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use crate::clock::Clock;
use crate::config::params::PlantConfig;
use crate::error::{BeamError, Result};
use crate::physics::angle::BeamAngle;
use crate::physics::location::Location;
use crate::physics::rolling;
use crate::physics::state::PhysicalState;
use crate::stats::{Counter, IntegratorStats};

/// Lazily evaluated ball-on-beam plant.
///
/// State only moves when someone looks at it or changes the angle: every
/// forcing call collapses the time since the previous event into a single
/// integration step. All mutation happens under one lock; `peek_*` read the
/// last published values without taking it.
pub struct Integrator {
    clock: Arc<dyn Clock>,
    limit_mm: f64,
    angle_limit_deg: f64,
    state: Mutex<PhysicalState>,
    peek_position: AtomicU64,
    peek_angle: AtomicU64,
    fast_forwards: Counter,
    end_stop_hits: Counter,
}

impl Integrator {
    pub fn new(config: &PlantConfig, clock: Arc<dyn Clock>) -> Self {
        Self::resting_at(config, clock, 0.0)
    }

    /// Start with the ball at rest at `position_mm` (clamped to the beam).
    pub fn resting_at(config: &PlantConfig, clock: Arc<dyn Clock>, position_mm: f64) -> Self {
        let limit_mm = config.position_limit_mm;
        let position_mm = position_mm.clamp(-limit_mm, limit_mm);
        let state = PhysicalState::at_rest(position_mm, config.initial_location, clock.now());
        Self {
            clock,
            limit_mm,
            angle_limit_deg: config.angle_limit_deg,
            state: Mutex::new(state),
            peek_position: AtomicU64::new(position_mm.to_bits()),
            peek_angle: AtomicU64::new(0.0f64.to_bits()),
            fast_forwards: Counter::default(),
            end_stop_hits: Counter::default(),
        }
    }

    /// Check `degrees` against this plant's angle limit.
    pub fn angle(&self, degrees: f64) -> Result<BeamAngle> {
        BeamAngle::new(degrees, self.angle_limit_deg)
    }

    /// Integrate up to now with the old angle, then commit the new one.
    ///
    /// The angle is re-checked against this plant's limit, so one built for a
    /// wider beam is refused before any state changes.
    pub fn set_angle(&self, angle: BeamAngle) -> Result<()> {
        if angle.degrees().abs() > self.angle_limit_deg {
            return Err(BeamError::AngleOutOfRange {
                angle_deg: angle.degrees(),
                limit_deg: self.angle_limit_deg,
            });
        }
        let now = self.clock.now();
        let mut s = self.state.lock();
        self.advance(&mut s, now);
        s.angle = angle;
        self.peek_angle
            .store(angle.degrees().to_bits(), Ordering::Relaxed);
        Ok(())
    }

    /// Integrate up to now and return the position (mm).
    pub fn get_position(&self) -> f64 {
        let now = self.clock.now();
        let mut s = self.state.lock();
        self.advance(&mut s, now);
        s.kin.position_mm
    }

    /// Integrate up to `now`.
    ///
    /// Used by the refresh scheduler with its own deadline. A `now` older than
    /// the last event integrates nothing and leaves the timestamp alone.
    pub fn fast_forward_to(&self, now: Instant) {
        let mut s = self.state.lock();
        self.advance(&mut s, now);
    }

    /// Last computed position without integrating.
    #[inline]
    pub fn peek_position(&self) -> f64 {
        f64::from_bits(self.peek_position.load(Ordering::Relaxed))
    }

    /// Last committed angle (deg) without integrating.
    #[inline]
    pub fn peek_angle(&self) -> f64 {
        f64::from_bits(self.peek_angle.load(Ordering::Relaxed))
    }

    /// Change gravity for subsequent steps. Kinematics are left untouched.
    pub fn set_location(&self, location: Location) {
        let mut s = self.state.lock();
        if s.location != location {
            log::debug!("relocating plant: {} -> {}", s.location, location);
        }
        s.location = location;
    }

    pub fn location(&self) -> Location {
        self.state.lock().location
    }

    /// Copy of the full state as last computed.
    pub fn snapshot(&self) -> PhysicalState {
        *self.state.lock()
    }

    pub fn stats(&self) -> IntegratorStats {
        IntegratorStats {
            fast_forwards: self.fast_forwards.get(),
            end_stop_hits: self.end_stop_hits.get(),
        }
    }

    fn advance(&self, s: &mut PhysicalState, now: Instant) {
        self.fast_forwards.bump();

        let dt = now.saturating_duration_since(s.last_event).as_secs_f64();
        let step = rolling::tick(
            s.kin,
            s.angle.degrees(),
            s.location.gravity(),
            dt,
            self.limit_mm,
        );

        if step.end_stop.is_some() {
            self.end_stop_hits.bump();
        }

        s.kin = step.kin;
        s.acceleration = step.acceleration;
        if now > s.last_event {
            s.last_event = now;
        }

        self.peek_position
            .store(s.kin.position_mm.to_bits(), Ordering::Relaxed);
    }
}

impl std::fmt::Debug for Integrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Integrator")
            .field("state", &*self.state.lock())
            .field("limit_mm", &self.limit_mm)
            .finish()
    }
}
