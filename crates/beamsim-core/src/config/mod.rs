pub mod defaults;
pub mod params;
