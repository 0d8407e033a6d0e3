// PC Trace — Scheduler Tick Sources

use std::time::Instant;

/// Monotonic scheduler tick counter (wraps at `u32::MAX`).
pub trait TickSource {
    fn now(&self) -> u32;
}

impl<T: TickSource + ?Sized> TickSource for &T {
    fn now(&self) -> u32 {
        (**self).now()
    }
}

// ---------------------------------------------------------------------------
// FreeRTOS tick counter
// ---------------------------------------------------------------------------
#[cfg(target_os = "espidf")]
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeRtosTicks;

#[cfg(target_os = "espidf")]
impl TickSource for FreeRtosTicks {
    fn now(&self) -> u32 {
        unsafe { esp_idf_sys::xTaskGetTickCount() }
    }
}

// ---------------------------------------------------------------------------
// Host tick source: wall-clock time scaled to the scheduler tick rate
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy)]
pub struct InstantTicks {
    origin: Instant,
    tick_rate_hz: u32,
}

impl InstantTicks {
    pub fn new(tick_rate_hz: u32) -> Self {
        Self {
            origin: Instant::now(),
            tick_rate_hz,
        }
    }
}

impl TickSource for InstantTicks {
    fn now(&self) -> u32 {
        let elapsed_us = self.origin.elapsed().as_micros();
        (elapsed_us * self.tick_rate_hz as u128 / 1_000_000) as u32
    }
}
