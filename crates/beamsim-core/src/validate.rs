use crate::config::defaults::{MAX_CONVERSION_DELAY, MAX_REFRESH_PERIOD};
use crate::config::params::PlantConfig;
use crate::error::{BeamError, Result};

pub fn validate_config(c: &PlantConfig) -> Result<()> {
    if !(c.position_limit_mm.is_finite() && c.position_limit_mm > 0.0) {
        return Err(BeamError::InvalidConfig(
            "position_limit_mm must be finite and > 0".into(),
        ));
    }
    // Beyond 90 deg the ball would hang under the beam.
    if !(c.angle_limit_deg.is_finite() && c.angle_limit_deg > 0.0 && c.angle_limit_deg <= 90.0) {
        return Err(BeamError::InvalidConfig(
            "angle_limit_deg must be in (0, 90]".into(),
        ));
    }
    if c.refresh_period.is_zero() || c.refresh_period > MAX_REFRESH_PERIOD {
        return Err(BeamError::InvalidConfig(format!(
            "refresh_period must be in (0, {MAX_REFRESH_PERIOD:?}]"
        )));
    }
    if c.conversion_delay > MAX_CONVERSION_DELAY {
        return Err(BeamError::InvalidConfig(format!(
            "conversion_delay must be at most {MAX_CONVERSION_DELAY:?}"
        )));
    }
    if !(c.noise_sigma_mm.is_finite() && c.noise_sigma_mm >= 0.0) {
        return Err(BeamError::InvalidConfig(
            "noise_sigma_mm must be finite and >= 0".into(),
        ));
    }
    Ok(())
}
