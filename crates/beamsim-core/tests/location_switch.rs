use std::sync::Arc;
use std::time::Duration;

use beamsim_core::clock::ManualClock;
use beamsim_core::config::defaults::default_config;
use beamsim_core::physics::rolling;
use beamsim_core::{BallOnBeam, Integrator, Location};

#[test]
fn relocating_mid_flight_keeps_kinematics() {
    let clock = Arc::new(ManualClock::new());
    let i = Integrator::new(&default_config(), clock.clone());
    i.set_angle(i.angle(-8.0).unwrap()).unwrap();
    clock.advance(Duration::from_millis(200));
    i.get_position();

    let before = i.snapshot();
    let ff = i.stats().fast_forwards;
    i.set_location(Location::Moon);
    assert_eq!(i.stats().fast_forwards, ff, "relocation must not integrate");
    let after = i.snapshot();
    assert_eq!(before.kin, after.kin);
    assert_eq!(before.last_event, after.last_event);
    assert_eq!(after.location, Location::Moon);

    // Next step uses lunar gravity from the switch point.
    clock.advance(Duration::from_millis(100));
    let expected = rolling::tick(before.kin, -8.0, Location::Moon.gravity(), 0.1, 240.0);
    let p = i.get_position();
    assert!((p - expected.kin.position_mm).abs() < 1e-9);
    assert!((i.snapshot().velocity() - expected.kin.velocity).abs() < 1e-12);
}

#[test]
fn heavier_gravity_rolls_faster() {
    let run = |loc: Location| {
        let clock = Arc::new(ManualClock::new());
        let mut cfg = default_config();
        cfg.initial_location = loc;
        let p = BallOnBeam::with_clock(cfg, clock.clone()).unwrap();
        p.set_beam_angle(5.0).unwrap();
        clock.advance(Duration::from_millis(150));
        p.get_ball_position()
    };
    let moon = run(Location::Moon);
    let earth = run(Location::Earth);
    let jupiter = run(Location::Jupiter);
    assert!(jupiter < earth && earth < moon && moon < 0.0);
}

#[test]
fn move_to_via_plant_reports_location() {
    let p = BallOnBeam::new(default_config()).unwrap();
    p.move_to(Location::Pluto);
    assert_eq!(p.current_location(), Location::Pluto);
}
