// PC Trace — Profiler Context
//
// The only state shared between the timer interrupt and the trace task:
// the single-slot Sample Signal and the wake handle.  The interrupt side
// calls `deposit()`; the task side parks on the wake signal and calls
// `drain()`.  Histogram, window and emitter live in the task-owned
// `Collector`.

pub mod classifier;
pub mod collector;
pub mod histogram;
pub mod report;
pub mod signal;
pub mod wake;
pub mod window;

use core::num::NonZeroU32;

use self::signal::{SampleSignal, SignalCounts};
use self::wake::Wake;

pub struct Profiler<W> {
    signal: SampleSignal,
    wake: W,
}

impl<W: Wake> Profiler<W> {
    pub const fn new(wake: W) -> Self {
        Self {
            signal: SampleSignal::new(),
            wake,
        }
    }

    /// Interrupt side: publish a captured address and wake the trace task.
    #[inline]
    pub fn deposit(&self, raw_address: u32) {
        self.signal.deposit(raw_address);
        self.wake.wake();
    }

    /// Task side: take the pending sample, if any.
    #[inline]
    pub fn drain(&self) -> Option<NonZeroU32> {
        self.signal.take()
    }

    pub fn take_counts(&self) -> SignalCounts {
        self.signal.take_counts()
    }
}
