use std::thread;
use std::time::{Duration, Instant};

use beamsim_core::config::defaults::default_config;
use beamsim_core::{BallOnBeam, SimulationMode};

fn plant(period_ms: u64) -> BallOnBeam {
    let mut cfg = default_config();
    cfg.refresh_period = Duration::from_millis(period_ms);
    BallOnBeam::new(cfg).unwrap()
}

/// Peek once per period, half a period after each tick is due.
fn sample_mid_period(p: &BallOnBeam, period: Duration, n: u32) -> Vec<f64> {
    let start = Instant::now();
    (0..n)
        .map(|k| {
            let at = start + period * k + period / 2;
            if let Some(d) = at.checked_duration_since(Instant::now()) {
                thread::sleep(d);
            }
            p.peek_position()
        })
        .collect()
}

#[test]
fn open_loop_moves_without_callers() {
    let period = Duration::from_millis(40);
    for (angle, sign) in [(-10.0, 1.0), (10.0, -1.0)] {
        let p = plant(40);
        p.set_beam_angle(angle).unwrap();
        p.set_simulation_mode(SimulationMode::OpenLoop);
        let xs = sample_mid_period(&p, period, 6);
        p.set_simulation_mode(SimulationMode::ClosedLoop);

        for w in xs.windows(2) {
            assert!(
                (w[1] - w[0]) * sign > 0.0,
                "angle={angle} not moving as expected: {xs:?}"
            );
        }
    }
}

#[test]
fn closed_loop_stays_put_until_observed() {
    let p = plant(10);
    p.set_beam_angle(-10.0).unwrap();
    thread::sleep(Duration::from_millis(80));
    assert_eq!(p.peek_position(), 0.0);
    assert!(p.get_ball_position() > 0.0);
}

#[test]
fn disarming_stops_autonomous_motion() {
    let p = plant(10);
    p.set_beam_angle(-5.0).unwrap();
    p.set_simulation_mode(SimulationMode::OpenLoop);
    thread::sleep(Duration::from_millis(60));
    p.set_simulation_mode(SimulationMode::ClosedLoop);

    let frozen = p.peek_position();
    assert!(frozen > 0.0);
    let ticks = p.counters().scheduler.ticks;
    thread::sleep(Duration::from_millis(60));
    assert_eq!(p.peek_position(), frozen);
    assert_eq!(p.counters().scheduler.ticks, ticks);
}
