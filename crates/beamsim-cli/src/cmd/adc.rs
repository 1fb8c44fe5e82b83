// crates/beamsim-cli/src/cmd/adc.rs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use beamsim_core::adc::registers::{split_data_register, CR_IE, CR_TRG};
use beamsim_core::clock::ManualClock;
use beamsim_core::config::defaults::default_config;
use beamsim_core::sensor::AdcSensor;
use beamsim_core::timer::Timer;
use beamsim_core::validate::validate_config;
use beamsim_core::{Adc, Integrator};
use clap::Args;
use parking_lot::Mutex;

#[derive(Args, Debug)]
pub struct AdcArgs {
    /// Ball position held during the run (mm)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub position_mm: f64,

    /// Conversions to run
    #[arg(long, default_value_t = 1_000)]
    pub count: usize,

    /// Conversion delay in microseconds
    #[arg(long, default_value_t = 2_000)]
    pub delay_us: u64,

    /// Noise sigma (mm)
    #[arg(long)]
    pub sigma: Option<f64>,

    #[arg(long)]
    pub seed: Option<u64>,

    /// Chain conversions from the end-of-conversion handler instead of polling
    #[arg(long)]
    pub interrupt: bool,
}

pub fn run(args: AdcArgs) -> anyhow::Result<()> {
    if args.count == 0 {
        anyhow::bail!("--count must be > 0");
    }

    let mut cfg = default_config();
    cfg.conversion_delay = Duration::from_micros(args.delay_us);
    cfg.noise_seed = args.seed;
    if let Some(s) = args.sigma {
        cfg.noise_sigma_mm = s;
    }
    validate_config(&cfg)?;

    // Frozen clock: the ball stays exactly where it was put.
    let integrator = Arc::new(Integrator::resting_at(
        &cfg,
        Arc::new(ManualClock::new()),
        args.position_mm,
    ));
    let adc = Adc::new(&cfg, integrator, Arc::new(Timer::new()?));

    log::info!(
        "adc: position={}mm count={} delay={:?} interrupt={}",
        args.position_mm,
        args.count,
        cfg.conversion_delay,
        args.interrupt
    );

    let started = Instant::now();
    let counts = if args.interrupt {
        collect_by_interrupt(&adc, args.count)?
    } else {
        let sensor = AdcSensor::new(adc.clone());
        (0..args.count)
            .map(|_| sensor.read_counts())
            .collect::<Result<Vec<_>, _>>()?
    };
    let elapsed = started.elapsed();

    let n = counts.len() as f64;
    let mean = counts.iter().map(|&c| f64::from(c)).sum::<f64>() / n;
    let var = if counts.len() > 1 {
        counts
            .iter()
            .map(|&c| (f64::from(c) - mean).powi(2))
            .sum::<f64>()
            / (n - 1.0)
    } else {
        0.0
    };
    let min = counts.iter().copied().min().unwrap_or(0);
    let max = counts.iter().copied().max().unwrap_or(0);
    let mm_per_count = (cfg.position_max() - cfg.position_min()) / 4096.0;

    println!("conversions: {}", counts.len());
    println!("elapsed:     {:.3}s", elapsed.as_secs_f64());
    println!(
        "mean:        {:.2} counts ({:.3} mm)",
        mean,
        adc.counts_to_mm(0) + mean * mm_per_count
    );
    println!(
        "stddev:      {:.2} counts ({:.3} mm)",
        var.sqrt(),
        var.sqrt() * mm_per_count
    );
    println!("min/max:     {min} / {max}");
    let s = adc.stats();
    println!(
        "adc:         triggers={} conversions={} interrupts={} superseded={}",
        s.triggers, s.conversions, s.interrupts, s.superseded
    );

    Ok(())
}

/// Wall-clock allowance for `count` chained conversions.
fn interrupt_budget(delay: Duration, count: usize) -> anyhow::Result<Duration> {
    let n = u32::try_from(count)
        .map_err(|_| anyhow::anyhow!("--count {count} too large for --interrupt"))?;
    delay
        .checked_mul(n)
        .and_then(|d| d.checked_mul(10))
        .and_then(|d| d.checked_add(Duration::from_secs(1)))
        .ok_or_else(|| anyhow::anyhow!("--count {count} x {delay:?} overflows the run budget"))
}

fn collect_by_interrupt(adc: &Adc, count: usize) -> anyhow::Result<Vec<u16>> {
    let budget = interrupt_budget(adc.conversion_delay(), count)?;
    let seen = Arc::new(Mutex::new(Vec::with_capacity(count)));
    let done = Arc::new(AtomicBool::new(false));

    {
        let (adc2, seen, done) = (adc.clone(), Arc::clone(&seen), Arc::clone(&done));
        adc.attach_handler(move || {
            let (counts, _) = split_data_register(adc2.read_data_register());
            let mut v = seen.lock();
            v.push(counts);
            if v.len() < count {
                adc2.write_control_register(CR_TRG | CR_IE);
            } else {
                done.store(true, Ordering::SeqCst);
            }
        });
    }

    adc.write_control_register(CR_TRG | CR_IE);

    let until = Instant::now() + budget;
    while !done.load(Ordering::SeqCst) {
        if Instant::now() >= until {
            adc.detach_handler();
            anyhow::bail!("interrupt chain stalled after {budget:?}");
        }
        thread::sleep(Duration::from_millis(1));
    }
    adc.detach_handler();

    let v = seen.lock().clone();
    Ok(v)
}
