// crates/beamsim-cli/src/cmd/mod.rs

pub mod adc;
pub mod locations;
pub mod sim;
