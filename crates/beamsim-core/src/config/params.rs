// crates/beamsim-core/src/config/params.rs

use std::time::Duration;

use crate::physics::location::Location;

/// Plant parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct PlantConfig {
    /// Beam half-length; position lives in `-limit..=limit` (mm).
    pub position_limit_mm: f64,
    /// Largest accepted inclination magnitude (deg).
    pub angle_limit_deg: f64,
    /// Open-loop refresh cadence.
    pub refresh_period: Duration,
    /// Time between an ADC trigger and end of conversion.
    pub conversion_delay: Duration,
    /// Standard deviation of injected measurement noise (mm).
    pub noise_sigma_mm: f64,
    /// Seed for the noise generator; `None` draws one from the OS once.
    pub noise_seed: Option<u64>,
    pub initial_location: Location,
}

impl PlantConfig {
    #[inline]
    pub fn position_min(&self) -> f64 {
        -self.position_limit_mm
    }

    #[inline]
    pub fn position_max(&self) -> f64 {
        self.position_limit_mm
    }
}

impl Default for PlantConfig {
    fn default() -> Self {
        crate::config::defaults::default_config()
    }
}
