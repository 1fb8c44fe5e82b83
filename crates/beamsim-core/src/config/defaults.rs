// crates/beamsim-core/src/config/defaults.rs

use std::time::Duration;

use crate::config::params::PlantConfig;
use crate::physics::location::Location;

pub const POSITION_LIMIT_MM: f64 = 240.0;
pub const ANGLE_LIMIT_DEG: f64 = 15.0;
pub const REFRESH_PERIOD: Duration = Duration::from_millis(100);
pub const CONVERSION_DELAY: Duration = Duration::from_millis(2);
pub const NOISE_SIGMA_MM: f64 = 4.0;

/// Upper bounds keeping `Instant + duration` arithmetic in range.
pub const MAX_REFRESH_PERIOD: Duration = Duration::from_secs(60);
pub const MAX_CONVERSION_DELAY: Duration = Duration::from_secs(1);

pub fn default_config() -> PlantConfig {
    PlantConfig {
        position_limit_mm: POSITION_LIMIT_MM,
        angle_limit_deg: ANGLE_LIMIT_DEG,
        refresh_period: REFRESH_PERIOD,
        conversion_delay: CONVERSION_DELAY,
        noise_sigma_mm: NOISE_SIGMA_MM,
        noise_seed: None,
        initial_location: Location::Earth,
    }
}
