// crates/beamsim-cli/src/cmd/sim.rs

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use beamsim_core::clock::{Clock, ManualClock, MonotonicClock};
use beamsim_core::config::defaults::default_config;
use beamsim_core::sensor::PositionSensor;
use beamsim_core::{BallOnBeam, Location, SimulationMode};
use clap::{Args, ValueEnum};

use crate::io::jsonl::{self, Sample};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Lazy: the plant moves only when sampled.
    Closed,
    /// Refresh timer keeps the plant moving between samples.
    Open,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SensorArg {
    /// Forced exact read.
    Ideal,
    /// Trigger + poll the simulated ADC (noisy, 12-bit).
    Adc,
    /// Last computed value, no forcing.
    Peek,
}

#[derive(Args, Debug)]
pub struct SimArgs {
    /// Beam angle in degrees (positive rolls toward negative positions)
    #[arg(long, default_value_t = -5.0, allow_hyphen_values = true)]
    pub angle: f64,

    /// Starting location
    #[arg(long, default_value = "earth")]
    pub location: Location,

    #[arg(long, value_enum, default_value_t = ModeArg::Closed)]
    pub mode: ModeArg,

    /// How each sample is read
    #[arg(long, value_enum, default_value_t = SensorArg::Ideal)]
    pub sensor: SensorArg,

    /// Run length
    #[arg(long, default_value_t = 1_000)]
    pub duration_ms: u64,

    /// Sampling interval
    #[arg(long, default_value_t = 50)]
    pub sample_ms: u64,

    /// Override the open-loop refresh period
    #[arg(long)]
    pub period_ms: Option<u64>,

    /// Noise seed (ADC sensor)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override noise sigma in mm (ADC sensor)
    #[arg(long)]
    pub sigma: Option<f64>,

    /// Switch location at this time...
    #[arg(long, requires = "relocate_to")]
    pub relocate_at_ms: Option<u64>,

    /// ...to this location
    #[arg(long, requires = "relocate_at_ms")]
    pub relocate_to: Option<Location>,

    /// Setpoint annotation written alongside each sample
    #[arg(long, allow_hyphen_values = true)]
    pub target: Option<f64>,

    /// Step a virtual clock instead of sleeping (closed loop only)
    #[arg(long)]
    pub virtual_time: bool,

    /// Output path; stdout if omitted
    #[arg(long)]
    pub output: Option<String>,

    /// Print component counters to stderr
    #[arg(long)]
    pub stats: bool,
}

pub fn run(args: SimArgs) -> anyhow::Result<()> {
    if args.sample_ms == 0 {
        anyhow::bail!("--sample-ms must be > 0");
    }
    if args.virtual_time && args.mode == ModeArg::Open {
        anyhow::bail!("--virtual-time needs --mode closed; the refresh timer runs on real time");
    }

    let mut cfg = default_config();
    cfg.initial_location = args.location;
    cfg.noise_seed = args.seed;
    if let Some(p) = args.period_ms {
        cfg.refresh_period = Duration::from_millis(p);
    }
    if let Some(s) = args.sigma {
        cfg.noise_sigma_mm = s;
    }

    let manual = Arc::new(ManualClock::new());
    let clock: Arc<dyn Clock> = if args.virtual_time {
        manual.clone()
    } else {
        Arc::new(MonotonicClock)
    };
    let plant = BallOnBeam::with_clock(cfg, clock)?;
    plant.set_beam_angle(args.angle)?;
    if let Some(t) = args.target {
        plant.set_target_position(t);
    }
    if args.mode == ModeArg::Open {
        plant.set_simulation_mode(SimulationMode::OpenLoop);
    }

    log::info!(
        "sim: angle={}deg location={} mode={:?} sensor={:?} duration={}ms",
        args.angle,
        args.location,
        args.mode,
        args.sensor,
        args.duration_ms
    );

    let ideal = plant.ideal_sensor();
    let adc = plant.adc_sensor();
    let relocation = args.relocate_at_ms.zip(args.relocate_to);
    let mut relocated = false;

    let n = args.duration_ms / args.sample_ms;
    let mut samples = Vec::with_capacity(n as usize + 1);
    let start = Instant::now();

    for k in 0..=n {
        let t_ms = k * args.sample_ms;
        if args.virtual_time {
            if k > 0 {
                manual.advance(Duration::from_millis(args.sample_ms));
            }
        } else if let Some(d) = (start + Duration::from_millis(t_ms)).checked_duration_since(Instant::now()) {
            thread::sleep(d);
        }

        if let Some((at, to)) = relocation {
            if !relocated && t_ms >= at {
                plant.move_to(to);
                relocated = true;
            }
        }

        let position_mm = match args.sensor {
            SensorArg::Ideal => ideal.read_mm()?,
            SensorArg::Adc => adc.read_mm()?,
            SensorArg::Peek => plant.peek_position(),
        };

        samples.push(Sample {
            t_ms,
            position_mm,
            angle_deg: plant.peek_angle(),
            target_mm: args.target.map(|_| plant.target_position()),
        });
    }

    plant.set_simulation_mode(SimulationMode::ClosedLoop);

    match args.output.as_deref() {
        Some(p) => jsonl::write_samples_file(p, &samples)?,
        None => jsonl::write_samples_stdout(&samples)?,
    }

    if args.stats {
        let c = plant.counters();
        eprintln!(
            "sim ok: samples={} location={} fast_forwards={} end_stop_hits={} ticks={} conversions={}",
            samples.len(),
            plant.current_location(),
            c.integrator.fast_forwards,
            c.integrator.end_stop_hits,
            c.scheduler.ticks,
            c.adc.conversions
        );
    }

    Ok(())
}
