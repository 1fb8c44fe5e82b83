// crates/beamsim-core/src/adc/quantize.rs

use crate::adc::registers::{ADC_CODES, ADC_MAX};

/// Map a position onto 12-bit counts with round-to-nearest.
///
/// `min` maps to 0; anything at or past `max` saturates at 4095, as does
/// anything below `min` at 0.
pub fn to_counts(position_mm: f64, min: f64, max: f64) -> u16 {
    let span = max - min;
    let raw = ((position_mm - min) * f64::from(ADC_CODES) / span).round();
    if raw.is_nan() || raw <= 0.0 {
        0
    } else if raw >= f64::from(ADC_MAX) {
        ADC_MAX
    } else {
        raw as u16
    }
}

/// Inverse of [`to_counts`], up to quantisation.
pub fn to_mm(counts: u16, min: f64, max: f64) -> f64 {
    min + f64::from(counts) * (max - min) / f64::from(ADC_CODES)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: f64 = -240.0;
    const MAX: f64 = 240.0;

    #[test]
    fn centre_and_ends() {
        assert_eq!(to_counts(MIN, MIN, MAX), 0);
        assert_eq!(to_counts(0.0, MIN, MAX), 2048);
        assert_eq!(to_counts(MAX, MIN, MAX), ADC_MAX);
    }

    #[test]
    fn saturates_outside_range() {
        assert_eq!(to_counts(-300.0, MIN, MAX), 0);
        assert_eq!(to_counts(1e9, MIN, MAX), ADC_MAX);
        assert_eq!(to_counts(f64::NAN, MIN, MAX), 0);
    }

    #[test]
    fn rounds_to_nearest() {
        let lsb = (MAX - MIN) / 4096.0;
        assert_eq!(to_counts(MIN + 0.49 * lsb, MIN, MAX), 0);
        assert_eq!(to_counts(MIN + 0.51 * lsb, MIN, MAX), 1);
    }

    #[test]
    fn back_conversion_within_one_lsb() {
        let lsb = (MAX - MIN) / 4096.0;
        for p in [-200.0, -13.7, 0.0, 88.8, 239.0] {
            let back = to_mm(to_counts(p, MIN, MAX), MIN, MAX);
            assert!((back - p).abs() <= lsb, "p={p} back={back}");
        }
    }
}
