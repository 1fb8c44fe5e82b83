// crates/beamsim-core/src/adc/peripheral.rs

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;

use crate::adc::noise::GaussianNoise;
use crate::adc::quantize;
use crate::adc::registers::{self, Control};
use crate::config::params::PlantConfig;
use crate::physics::integrator::Integrator;
use crate::stats::{AdcStats, Counter};
use crate::timer::{Timer, TimerHandle};

/// End-of-conversion callback. Runs on the timer thread with no ADC lock held.
pub type Handler = Arc<dyn Fn() + Send + Sync + 'static>;

struct AdcState {
    value: u16,
    eoc: bool,
    interrupt_enabled: bool,
    pending: Option<TimerHandle>,
    /// Bumped on every trigger; a completion only commits if it still matches.
    generation: u64,
    handler: Option<Handler>,
}

struct Inner {
    integrator: Arc<Integrator>,
    timer: Arc<Timer>,
    delay: Duration,
    min_mm: f64,
    max_mm: f64,
    state: Mutex<AdcState>,
    noise: Mutex<GaussianNoise>,
    triggers: Counter,
    conversions: Counter,
    superseded: Counter,
    interrupts: Counter,
}

/// Simulated 12-bit ADC sampling the ball position.
///
/// A trigger clears EOC and schedules the conversion `delay` later. The
/// conversion forces the integrator up to that moment, adds gaussian noise,
/// saturates to 12 bits, sets EOC and, with IE set, calls the handler.
#[derive(Clone)]
pub struct Adc {
    inner: Arc<Inner>,
}

impl Adc {
    pub fn new(config: &PlantConfig, integrator: Arc<Integrator>, timer: Arc<Timer>) -> Self {
        let noise = GaussianNoise::new(config.noise_seed, config.noise_sigma_mm);
        Self::with_noise(config, integrator, timer, noise)
    }

    pub fn with_noise(
        config: &PlantConfig,
        integrator: Arc<Integrator>,
        timer: Arc<Timer>,
        noise: GaussianNoise,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                integrator,
                timer,
                delay: config.conversion_delay,
                min_mm: config.position_min(),
                max_mm: config.position_max(),
                state: Mutex::new(AdcState {
                    value: 0,
                    eoc: false,
                    interrupt_enabled: false,
                    pending: None,
                    generation: 0,
                    handler: None,
                }),
                noise: Mutex::new(noise),
                triggers: Counter::default(),
                conversions: Counter::default(),
                superseded: Counter::default(),
                interrupts: Counter::default(),
            }),
        }
    }

    pub fn write_control_register(&self, raw: u16) {
        let ctl = Control::decode(raw);
        let mut st = self.inner.state.lock();
        st.interrupt_enabled = ctl.interrupt_enable;
        if !ctl.trigger {
            return;
        }

        self.inner.triggers.bump();
        st.eoc = false;
        st.generation = st.generation.wrapping_add(1);
        if let Some(old) = st.pending.take() {
            // The completion may be waiting on this lock; the generation
            // check discards it, so don't wait for it here.
            old.cancel_nowait();
            self.inner.superseded.bump();
            log::debug!("adc: conversion superseded by new trigger");
        }

        let generation = st.generation;
        let weak = Arc::downgrade(&self.inner);
        st.pending = Some(
            self.inner
                .timer
                .schedule_after(self.inner.delay, move |_| complete(&weak, generation)),
        );
    }

    /// Sample bits 0-11, EOC bit 15. No side effects.
    pub fn read_data_register(&self) -> u16 {
        let st = self.inner.state.lock();
        registers::data_register(st.value, st.eoc)
    }

    /// Install `handler`, replacing any previous one.
    pub fn attach_handler<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.state.lock().handler = Some(Arc::new(handler));
    }

    pub fn detach_handler(&self) {
        self.inner.state.lock().handler = None;
    }

    pub fn interrupt_enabled(&self) -> bool {
        self.inner.state.lock().interrupt_enabled
    }

    pub fn conversion_pending(&self) -> bool {
        self.inner.state.lock().pending.is_some()
    }

    pub fn conversion_delay(&self) -> Duration {
        self.inner.delay
    }

    /// Convert counts back to millimetres on this converter's scale.
    pub fn counts_to_mm(&self, counts: u16) -> f64 {
        quantize::to_mm(counts, self.inner.min_mm, self.inner.max_mm)
    }

    pub fn stats(&self) -> AdcStats {
        AdcStats {
            triggers: self.inner.triggers.get(),
            conversions: self.inner.conversions.get(),
            superseded: self.inner.superseded.get(),
            interrupts: self.inner.interrupts.get(),
        }
    }
}

fn complete(weak: &Weak<Inner>, generation: u64) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    if inner.state.lock().generation != generation {
        return;
    }

    let position = inner.integrator.get_position();
    let noisy = position + inner.noise.lock().sample();
    let counts = quantize::to_counts(noisy, inner.min_mm, inner.max_mm);

    let handler = {
        let mut st = inner.state.lock();
        // Re-triggered while sampling.
        if st.generation != generation {
            return;
        }
        st.value = counts;
        st.eoc = true;
        st.pending = None;
        inner.conversions.bump();
        if st.interrupt_enabled {
            st.handler.clone()
        } else {
            None
        }
    };

    if let Some(h) = handler {
        inner.interrupts.bump();
        h();
    }
}

impl std::fmt::Debug for Adc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let st = self.inner.state.lock();
        f.debug_struct("Adc")
            .field("value", &st.value)
            .field("eoc", &st.eoc)
            .field("interrupt_enabled", &st.interrupt_enabled)
            .field("pending", &st.pending.is_some())
            .finish()
    }
}
