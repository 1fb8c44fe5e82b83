// crates/beamsim-cli/src/main.rs

use clap::{Parser, Subcommand};

mod cmd;
mod io;

#[derive(Parser)]
#[command(name = "beamsim")]
#[command(about = "Ball-on-beam plant simulator", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Hold the beam at an angle and sample the ball (JSONL)
    Sim(cmd::sim::SimArgs),

    /// Run ADC conversions at a fixed ball position and report count statistics
    Adc(cmd::adc::AdcArgs),

    /// List locations and their gravity
    Locations(cmd::locations::LocationsArgs),
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Sim(args) => cmd::sim::run(args),
        Commands::Adc(args) => cmd::adc::run(args),
        Commands::Locations(args) => cmd::locations::run(args),
    }
}
