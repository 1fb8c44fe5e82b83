use std::sync::Arc;

use beamsim_core::clock::ManualClock;
use beamsim_core::config::defaults::default_config;
use beamsim_core::Integrator;
use proptest::prelude::*;

proptest! {
    /// Level beam: nothing moves, whatever the start and however long we wait.
    #[test]
    fn level_beam_holds_any_position(
        start in -240.0f64..=240.0,
        gaps in prop::collection::vec(0u64..5_000, 1..20)
    ) {
        let clock = Arc::new(ManualClock::new());
        let i = Integrator::resting_at(&default_config(), clock.clone(), start);
        i.set_angle(i.angle(0.0).unwrap()).unwrap();

        for ms in gaps {
            clock.advance(std::time::Duration::from_millis(ms));
            prop_assert_eq!(i.get_position(), start);
            let s = i.snapshot();
            prop_assert_eq!(s.velocity(), 0.0);
            prop_assert_eq!(s.acceleration, 0.0);
        }
    }
}

#[test]
fn long_idle_on_level_beam() {
    let clock = Arc::new(ManualClock::new());
    let i = Integrator::resting_at(&default_config(), clock.clone(), -17.25);
    clock.advance_secs(3600.0);
    assert_eq!(i.get_position(), -17.25);
}
