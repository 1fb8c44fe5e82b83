// crates/beamsim-cli/src/cmd/locations.rs

use beamsim_core::Location;
use clap::Args;

#[derive(Args)]
pub struct LocationsArgs {}

pub fn run(_args: LocationsArgs) -> anyhow::Result<()> {
    for l in Location::ALL {
        println!("{:<8} {:>6.2} m/s^2", l.name(), l.gravity());
    }
    Ok(())
}
