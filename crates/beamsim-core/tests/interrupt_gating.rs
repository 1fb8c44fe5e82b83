use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use beamsim_core::adc::registers::{CR_IE, CR_TRG, DR_EOC};
use beamsim_core::config::defaults::default_config;
use beamsim_core::{BallOnBeam, SimulationMode};
use parking_lot::Mutex;

fn plant(delay_ms: u64) -> BallOnBeam {
    let mut cfg = default_config();
    cfg.conversion_delay = Duration::from_millis(delay_ms);
    cfg.noise_seed = Some(5);
    BallOnBeam::new(cfg).unwrap()
}

fn settle(p: &BallOnBeam) {
    let until = Instant::now() + Duration::from_secs(1);
    while p.read_data_register() & DR_EOC == 0 && Instant::now() < until {
        thread::sleep(Duration::from_micros(200));
    }
    // Let the handler (which runs after EOC is published) finish.
    thread::sleep(Duration::from_millis(10));
}

#[test]
fn handler_silent_without_ie() {
    let p = plant(2);
    let hits = Arc::new(AtomicUsize::new(0));
    let h = hits.clone();
    p.attach_handler(move || {
        h.fetch_add(1, Ordering::SeqCst);
    });

    for _ in 0..5 {
        p.write_control_register(CR_TRG);
        settle(&p);
    }
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(p.counters().adc.conversions, 5);
    assert_eq!(p.counters().adc.interrupts, 0);
}

#[test]
fn handler_fires_once_per_conversion_after_delay() {
    let delay = Duration::from_millis(15);
    let p = plant(15);
    let fired_at = Arc::new(Mutex::new(Vec::<Instant>::new()));
    let f = fired_at.clone();
    p.attach_handler(move || f.lock().push(Instant::now()));

    for n in 1..=4 {
        let triggered = Instant::now();
        p.write_control_register(CR_TRG | CR_IE);
        assert_eq!(fired_at.lock().len(), n - 1, "handler ran before conversion delay");
        settle(&p);

        let fired = fired_at.lock();
        assert_eq!(fired.len(), n);
        assert!(fired[n - 1] >= triggered + delay);
    }
}

#[test]
fn ie_without_handler_just_converts() {
    let p = plant(2);
    p.write_control_register(CR_TRG | CR_IE);
    settle(&p);
    assert_ne!(p.read_data_register() & DR_EOC, 0);
    assert_eq!(p.counters().adc.interrupts, 0);
}

#[test]
fn replacing_the_handler_is_idempotent() {
    let p = plant(2);
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let (a, b) = (first.clone(), second.clone());
    p.attach_handler(move || {
        a.fetch_add(1, Ordering::SeqCst);
    });
    p.attach_handler(move || {
        b.fetch_add(1, Ordering::SeqCst);
    });

    p.write_control_register(CR_TRG | CR_IE);
    settle(&p);
    assert_eq!(first.load(Ordering::SeqCst), 0);
    assert_eq!(second.load(Ordering::SeqCst), 1);
}

#[test]
fn panicking_handler_leaves_adc_and_refresh_running() {
    let p = plant(2);
    p.attach_handler(|| panic!("handler bug"));
    p.write_control_register(CR_TRG | CR_IE);
    settle(&p);

    let hits = Arc::new(AtomicUsize::new(0));
    let h = hits.clone();
    p.attach_handler(move || {
        h.fetch_add(1, Ordering::SeqCst);
    });
    p.write_control_register(CR_TRG | CR_IE);
    settle(&p);
    assert_ne!(p.read_data_register() & DR_EOC, 0);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    p.set_beam_angle(-10.0).unwrap();
    p.set_simulation_mode(SimulationMode::OpenLoop);
    let start = p.peek_position();
    thread::sleep(Duration::from_millis(350));
    assert!(p.counters().scheduler.ticks >= 2);
    assert_ne!(p.peek_position(), start);
}
