//! Diagnostic counters shared across threads.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    #[inline]
    pub fn bump(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntegratorStats {
    pub fast_forwards: u64,
    pub end_stop_hits: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdcStats {
    pub triggers: u64,
    pub conversions: u64,
    /// Pending conversions replaced by a newer trigger.
    pub superseded: u64,
    pub interrupts: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub arms: u64,
    pub ticks: u64,
}

/// Snapshot of every component's counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counters {
    pub integrator: IntegratorStats,
    pub adc: AdcStats,
    pub scheduler: SchedulerStats,
}
