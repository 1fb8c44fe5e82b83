pub mod error;
pub mod validate;

pub mod clock;
pub mod timer;
pub mod config;
pub mod physics;
pub mod scheduler;
pub mod adc;
pub mod sensor;
pub mod stats;
pub mod plant;

pub use crate::adc::peripheral::Adc;
pub use crate::config::params::PlantConfig;
pub use crate::error::{BeamError, Result};
pub use crate::physics::angle::BeamAngle;
pub use crate::physics::integrator::Integrator;
pub use crate::physics::location::Location;
pub use crate::plant::BallOnBeam;
pub use crate::scheduler::SimulationMode;
