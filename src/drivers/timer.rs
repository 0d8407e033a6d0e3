// PC Trace — Periodic Sampling Timer
//
// Capability set the trace task configures once at startup.  The hardware
// timer group driver and the simulated timer both implement it, so the
// collection state machine never knows which one is ticking.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::bail;

use crate::config::*;

/// Interrupt handler registered with a timer.  Runs in interrupt context on
/// the device: no blocking, no allocation, no logging.
pub type IsrHandler = Box<dyn FnMut() + Send + 'static>;

// ---------------------------------------------------------------------------
// Timer period: prescale × load source-clock cycles
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerPeriod {
    pub prescale: u32,
    pub load: u32,
}

impl TimerPeriod {
    /// Configured sampling period (10 ms).
    pub const SAMPLE: Self = Self {
        prescale: TIMER_PRESCALE,
        load: TIMER_LOAD,
    };

    pub fn cycles(&self) -> u64 {
        self.prescale as u64 * self.load as u64
    }

    pub fn period_us(&self, source_hz: u32) -> u64 {
        self.cycles() * 1_000_000 / source_hz as u64
    }

    /// Sampling rate in Hz (rounded down).
    pub fn rate_hz(&self, source_hz: u32) -> u32 {
        (source_hz as u64 / self.cycles()) as u32
    }

    /// Upper bound on interrupts inside a window of `window_ticks` scheduler
    /// ticks, i.e. the most samples one window can accept.
    pub fn max_samples(&self, source_hz: u32, window_ticks: u32, tick_rate_hz: u32) -> u64 {
        let window_us = window_ticks as u64 * 1_000_000 / tick_rate_hz as u64;
        window_us.div_ceil(self.period_us(source_hz))
    }
}

// ---------------------------------------------------------------------------
// Timer capability
// ---------------------------------------------------------------------------
pub trait SampleTimer {
    /// Program prescale and load values.  Periodic, auto-reloading.
    fn configure(&mut self, period: TimerPeriod) -> anyhow::Result<()>;

    /// Register the interrupt handler.  The driver clears the timer's
    /// interrupt-pending flag before calling it.
    fn on_fire(&mut self, handler: IsrHandler) -> anyhow::Result<()>;

    /// Enable the interrupt and start counting.
    fn enable(&mut self) -> anyhow::Result<()>;

    fn disable(&mut self) -> anyhow::Result<()>;

    /// configure → on_fire → enable.
    fn start(&mut self, period: TimerPeriod, handler: IsrHandler) -> anyhow::Result<()> {
        self.configure(period)?;
        self.on_fire(handler)?;
        self.enable()
    }
}

// ---------------------------------------------------------------------------
// Simulated timer — fired explicitly by tests or by a host thread
// ---------------------------------------------------------------------------
#[derive(Default)]
struct SimState {
    handler: Mutex<Option<IsrHandler>>,
    period: Mutex<Option<TimerPeriod>>,
    enabled: AtomicBool,
    pending: AtomicBool,
    fired: AtomicU32,
}

/// Cloneable handle; every clone drives the same timer.
#[derive(Clone, Default)]
pub struct SimulatedTimer {
    state: Arc<SimState>,
}

impl SimulatedTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate one timer expiry.  Returns `false` if the timer is disabled
    /// or has no handler.
    pub fn fire(&self) -> bool {
        if !self.state.enabled.load(Ordering::Acquire) {
            return false;
        }

        self.state.pending.store(true, Ordering::Release);
        let mut handler = self.state.handler.lock().unwrap_or_else(|e| e.into_inner());
        let Some(handler) = handler.as_mut() else {
            return false;
        };

        // Acknowledge first, as the hardware requires.
        self.state.pending.store(false, Ordering::Release);
        self.state.fired.fetch_add(1, Ordering::Relaxed);
        handler();
        true
    }

    pub fn is_enabled(&self) -> bool {
        self.state.enabled.load(Ordering::Acquire)
    }

    pub fn is_pending(&self) -> bool {
        self.state.pending.load(Ordering::Acquire)
    }

    pub fn fired(&self) -> u32 {
        self.state.fired.load(Ordering::Relaxed)
    }

    pub fn period(&self) -> Option<TimerPeriod> {
        *self.state.period.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SampleTimer for SimulatedTimer {
    fn configure(&mut self, period: TimerPeriod) -> anyhow::Result<()> {
        if period.prescale == 0 || period.load == 0 {
            bail!("timer period must be non-zero ({period:?})");
        }
        *self.state.period.lock().unwrap_or_else(|e| e.into_inner()) = Some(period);
        Ok(())
    }

    fn on_fire(&mut self, handler: IsrHandler) -> anyhow::Result<()> {
        *self.state.handler.lock().unwrap_or_else(|e| e.into_inner()) = Some(handler);
        Ok(())
    }

    fn enable(&mut self) -> anyhow::Result<()> {
        if self.period().is_none() {
            bail!("timer enabled before configure()");
        }
        self.state.enabled.store(true, Ordering::Release);
        Ok(())
    }

    fn disable(&mut self) -> anyhow::Result<()> {
        self.state.enabled.store(false, Ordering::Release);
        Ok(())
    }
}
