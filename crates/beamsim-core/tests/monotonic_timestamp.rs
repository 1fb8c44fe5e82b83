use std::sync::Arc;
use std::time::Duration;

use beamsim_core::clock::{Clock, ManualClock};
use beamsim_core::config::defaults::default_config;
use beamsim_core::Integrator;
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Wait(u64),
    SetAngle(f64),
    GetPosition,
    /// Tick whose deadline lies this many ms in the past.
    StaleTick(u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u64..500).prop_map(Op::Wait),
        (-15.0f64..=15.0).prop_map(Op::SetAngle),
        Just(Op::GetPosition),
        (0u64..500).prop_map(Op::StaleTick),
    ]
}

proptest! {
    #[test]
    fn last_event_never_goes_backwards(ops in prop::collection::vec(op(), 1..64)) {
        let clock = Arc::new(ManualClock::new());
        // Give stale ticks room to point before the start.
        clock.advance(Duration::from_secs(1));
        let i = Integrator::new(&default_config(), clock.clone());

        let mut last = i.snapshot().last_event;
        for op in ops {
            match op {
                Op::Wait(ms) => clock.advance(Duration::from_millis(ms)),
                Op::SetAngle(a) => i.set_angle(i.angle(a).unwrap()).unwrap(),
                Op::GetPosition => {
                    let p = i.get_position();
                    prop_assert!((-240.0..=240.0).contains(&p));
                }
                Op::StaleTick(ms) => i.fast_forward_to(clock.now() - Duration::from_millis(ms)),
            }
            let now = i.snapshot().last_event;
            prop_assert!(now >= last);
            last = now;
        }
    }
}
