pub mod angle;
pub mod integrator;
pub mod location;
pub mod rolling;
pub mod state;
