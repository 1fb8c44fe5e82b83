// crates/beamsim-core/src/sensor.rs

//! Position front-ends over one plant.
//!
//! Controllers written against [`PositionSensor`] can run on the ideal
//! reading or go through the ADC without caring which.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::adc::peripheral::Adc;
use crate::adc::registers::{split_data_register, CR_IE, CR_TRG};
use crate::error::{BeamError, Result};
use crate::physics::integrator::Integrator;

pub trait PositionSensor {
    /// Current ball position (mm).
    fn read_mm(&self) -> Result<f64>;
}

/// Exact position, forcing the integrator.
#[derive(Clone, Debug)]
pub struct IdealSensor {
    integrator: Arc<Integrator>,
}

impl IdealSensor {
    pub fn new(integrator: Arc<Integrator>) -> Self {
        Self { integrator }
    }
}

impl PositionSensor for IdealSensor {
    fn read_mm(&self) -> Result<f64> {
        Ok(self.integrator.get_position())
    }
}

/// Polling driver: trigger, spin on EOC, scale counts back to mm.
#[derive(Clone, Debug)]
pub struct AdcSensor {
    adc: Adc,
    timeout: Duration,
    poll: Duration,
}

impl AdcSensor {
    pub fn new(adc: Adc) -> Self {
        let timeout = adc.conversion_delay() * 10 + Duration::from_millis(50);
        Self {
            adc,
            timeout,
            poll: Duration::from_micros(100),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// One conversion, in raw counts.
    pub fn read_counts(&self) -> Result<u16> {
        let ie = if self.adc.interrupt_enabled() { CR_IE } else { 0 };
        self.adc.write_control_register(CR_TRG | ie);

        let deadline = Instant::now() + self.timeout;
        loop {
            let (counts, eoc) = split_data_register(self.adc.read_data_register());
            if eoc {
                return Ok(counts);
            }
            if Instant::now() >= deadline {
                return Err(BeamError::ConversionTimeout(self.timeout));
            }
            thread::sleep(self.poll);
        }
    }
}

impl PositionSensor for AdcSensor {
    fn read_mm(&self) -> Result<f64> {
        Ok(self.adc.counts_to_mm(self.read_counts()?))
    }
}
