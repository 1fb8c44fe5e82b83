// crates/beamsim-core/src/plant.rs

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::adc::peripheral::Adc;
use crate::clock::{Clock, MonotonicClock};
use crate::config::params::PlantConfig;
use crate::error::Result;
use crate::physics::integrator::Integrator;
use crate::physics::location::Location;
use crate::scheduler::{RefreshScheduler, SimulationMode};
use crate::sensor::{AdcSensor, IdealSensor};
use crate::stats::Counters;
use crate::timer::Timer;
use crate::validate::validate_config;

/// The whole plant: integrator, refresh scheduler and ADC on one timer thread.
pub struct BallOnBeam {
    config: PlantConfig,
    integrator: Arc<Integrator>,
    scheduler: RefreshScheduler,
    adc: Adc,
    /// Controller setpoint, for display only (f64 bits).
    target_mm: AtomicU64,
    // Declared last so scheduled work is torn down before the thread joins.
    _timer: Arc<Timer>,
}

impl BallOnBeam {
    pub fn new(config: PlantConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(MonotonicClock))
    }

    pub fn with_clock(config: PlantConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        validate_config(&config)?;

        let timer = Arc::new(Timer::new()?);
        let integrator = Arc::new(Integrator::new(&config, clock));
        let scheduler = RefreshScheduler::new(
            Arc::clone(&timer),
            Arc::clone(&integrator),
            config.refresh_period,
        );
        let adc = Adc::new(&config, Arc::clone(&integrator), Arc::clone(&timer));

        log::debug!(
            "plant up: limit={}mm angle_limit={}deg location={}",
            config.position_limit_mm,
            config.angle_limit_deg,
            config.initial_location
        );

        Ok(Self {
            config,
            integrator,
            scheduler,
            adc,
            target_mm: AtomicU64::new(0.0f64.to_bits()),
            _timer: timer,
        })
    }

    // --- control surface ---

    /// Fails for angles outside the configured limit; the plant is untouched then.
    pub fn set_beam_angle(&self, degrees: f64) -> Result<()> {
        let angle = self.integrator.angle(degrees)?;
        self.integrator.set_angle(angle)
    }

    pub fn get_ball_position(&self) -> f64 {
        self.integrator.get_position()
    }

    pub fn move_to(&self, location: Location) {
        self.integrator.set_location(location);
    }

    pub fn set_simulation_mode(&self, mode: SimulationMode) {
        self.scheduler.set_mode(mode);
    }

    pub fn simulation_mode(&self) -> SimulationMode {
        self.scheduler.mode()
    }

    // --- display surface (non-forcing) ---

    pub fn peek_position(&self) -> f64 {
        self.integrator.peek_position()
    }

    pub fn peek_angle(&self) -> f64 {
        self.integrator.peek_angle()
    }

    pub fn current_location(&self) -> Location {
        self.integrator.location()
    }

    // --- hardware-style surface ---

    pub fn write_control_register(&self, raw: u16) {
        self.adc.write_control_register(raw);
    }

    pub fn read_data_register(&self) -> u16 {
        self.adc.read_data_register()
    }

    pub fn attach_handler<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.adc.attach_handler(handler);
    }

    // --- setpoint annotation ---

    pub fn set_target_position(&self, mm: f64) {
        self.target_mm.store(mm.to_bits(), Ordering::Relaxed);
    }

    pub fn target_position(&self) -> f64 {
        f64::from_bits(self.target_mm.load(Ordering::Relaxed))
    }

    // --- plumbing ---

    pub fn config(&self) -> &PlantConfig {
        &self.config
    }

    pub fn ideal_sensor(&self) -> IdealSensor {
        IdealSensor::new(Arc::clone(&self.integrator))
    }

    pub fn adc_sensor(&self) -> AdcSensor {
        AdcSensor::new(self.adc.clone())
    }

    pub fn counters(&self) -> Counters {
        Counters {
            integrator: self.integrator.stats(),
            adc: self.adc.stats(),
            scheduler: self.scheduler.stats(),
        }
    }
}
