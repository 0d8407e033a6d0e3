// PC Trace — Sample Signal
//
// Single-slot handoff between the timer interrupt (producer) and the trace
// task (consumer).  The slot is one atomic word: zero means "nothing ready",
// any other value is the pending raw address.  A zero capture is never a
// valid sample, so the sentinel costs nothing.
//
// A deposit that lands while a sample is still pending replaces it.  The
// replaced sample is lost; this bounded resolution is accepted and only
// counted for the per-window summary.

use core::num::NonZeroU32;
use core::sync::atomic::{AtomicU32, Ordering};

#[derive(Debug, Default)]
pub struct SampleSignal {
    slot: AtomicU32,
    captured: AtomicU32,
    overwritten: AtomicU32,
}

/// Capture counters accumulated since the last [`SampleSignal::take_counts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignalCounts {
    pub captured: u32,
    pub overwritten: u32,
}

impl SampleSignal {
    pub const fn new() -> Self {
        Self {
            slot: AtomicU32::new(0),
            captured: AtomicU32::new(0),
            overwritten: AtomicU32::new(0),
        }
    }

    /// Producer side.  Interrupt-safe: no locks, no allocation.
    #[inline]
    pub fn deposit(&self, raw_address: u32) {
        let previous = self.slot.swap(raw_address, Ordering::AcqRel);
        self.captured.fetch_add(1, Ordering::Relaxed);
        if previous != 0 {
            self.overwritten.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Consumer side.  Returns the pending address and clears the slot in one
    /// atomic step, so each deposit is observed at most once.
    #[inline]
    pub fn take(&self) -> Option<NonZeroU32> {
        NonZeroU32::new(self.slot.swap(0, Ordering::AcqRel))
    }

    pub fn is_ready(&self) -> bool {
        self.slot.load(Ordering::Acquire) != 0
    }

    /// Read and reset the capture counters.
    pub fn take_counts(&self) -> SignalCounts {
        SignalCounts {
            captured: self.captured.swap(0, Ordering::Relaxed),
            overwritten: self.overwritten.swap(0, Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn empty_signal_yields_nothing() {
        let signal = SampleSignal::new();
        assert!(!signal.is_ready());
        assert_eq!(signal.take(), None);
    }

    #[test]
    fn deposit_is_consumed_once() {
        let signal = SampleSignal::new();
        signal.deposit(0x1234);
        assert!(signal.is_ready());
        assert_eq!(signal.take().map(NonZeroU32::get), Some(0x1234));
        assert_eq!(signal.take(), None);
    }

    #[test]
    fn second_deposit_replaces_pending_sample() {
        let signal = SampleSignal::new();
        signal.deposit(0x100);
        signal.deposit(0x200);

        assert_eq!(signal.take().map(NonZeroU32::get), Some(0x200));
        assert_eq!(signal.take(), None);
        assert_eq!(
            signal.take_counts(),
            SignalCounts { captured: 2, overwritten: 1 }
        );
        assert_eq!(signal.take_counts(), SignalCounts::default());
    }

    #[test]
    fn concurrent_deposits_are_taken_or_counted_as_overwritten() {
        const DEPOSITS: u32 = 50_000;
        let signal = Arc::new(SampleSignal::new());

        let producer = {
            let signal = Arc::clone(&signal);
            thread::spawn(move || {
                for i in 1..=DEPOSITS {
                    signal.deposit(i);
                }
            })
        };

        let mut taken = 0u32;
        let mut last = 0u32;
        while !producer.is_finished() {
            if let Some(raw) = signal.take() {
                // The producer writes increasing values; a torn or replayed
                // read would break monotonicity.
                assert!(raw.get() > last);
                last = raw.get();
                taken += 1;
            }
        }
        producer.join().unwrap();
        if signal.take().is_some() {
            taken += 1;
        }

        let counts = signal.take_counts();
        assert_eq!(counts.captured, DEPOSITS);
        assert_eq!(taken + counts.overwritten, DEPOSITS);
    }
}
