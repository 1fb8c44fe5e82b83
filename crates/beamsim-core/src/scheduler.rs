// crates/beamsim-core/src/scheduler.rs

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::physics::integrator::Integrator;
use crate::stats::{Counter, SchedulerStats};
use crate::timer::{Timer, TimerHandle};

/// Whether the plant advances on its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SimulationMode {
    /// Refresh timer armed; state moves without callers.
    OpenLoop,
    /// Purely lazy; state moves only when observed or driven.
    #[default]
    ClosedLoop,
}

/// Periodic fast-forward for open-loop runs.
///
/// Each tick integrates up to its own deadline, not the instant it happened
/// to fire, and the next deadline is `deadline + period`.
pub struct RefreshScheduler {
    timer: Arc<Timer>,
    integrator: Arc<Integrator>,
    period: Duration,
    armed: Mutex<Option<TimerHandle>>,
    arms: Counter,
    ticks: Arc<Counter>,
}

impl RefreshScheduler {
    pub fn new(timer: Arc<Timer>, integrator: Arc<Integrator>, period: Duration) -> Self {
        Self {
            timer,
            integrator,
            period,
            armed: Mutex::new(None),
            arms: Counter::default(),
            ticks: Arc::new(Counter::default()),
        }
    }

    pub fn set_mode(&self, mode: SimulationMode) {
        match mode {
            SimulationMode::OpenLoop => self.arm(),
            SimulationMode::ClosedLoop => self.disarm(),
        }
    }

    pub fn mode(&self) -> SimulationMode {
        if self.armed.lock().is_some() {
            SimulationMode::OpenLoop
        } else {
            SimulationMode::ClosedLoop
        }
    }

    pub fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            arms: self.arms.get(),
            ticks: self.ticks.get(),
        }
    }

    fn arm(&self) {
        let mut armed = self.armed.lock();
        if armed.is_some() {
            return;
        }

        let integrator = Arc::clone(&self.integrator);
        let ticks = Arc::clone(&self.ticks);
        let first = Instant::now() + self.period;
        let handle = self.timer.schedule_periodic(first, self.period, move |deadline| {
            ticks.bump();
            integrator.fast_forward_to(deadline);
            log::trace!("refresh tick: position={:.3}mm", integrator.peek_position());
        });

        self.arms.bump();
        log::debug!("refresh scheduler armed: period={:?}", self.period);
        *armed = Some(handle);
    }

    fn disarm(&self) {
        let handle = self.armed.lock().take();
        if let Some(handle) = handle {
            handle.cancel();
            log::debug!("refresh scheduler disarmed");
        }
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.disarm();
    }
}
