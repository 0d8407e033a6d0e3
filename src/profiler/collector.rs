// PC Trace — Collector (task-owned profiling state)
//
// One `step()` per wake-up:
//   1. take the pending sample (if any), classify it, bump its bin;
//   2. poll the window; on expiry flush every bin to the report queue,
//      zero the histogram and open the next window.

use core::num::NonZeroU32;

use crate::drivers::ticks::TickSource;
use crate::profiler::classifier::Classifier;
use crate::profiler::histogram::Histogram;
use crate::profiler::report::{FlushSummary, ReportEmitter};
use crate::profiler::wake::Wake;
use crate::profiler::window::{CollectionWindow, WindowState};
use crate::profiler::Profiler;

/// Per-window summary, produced when a window is flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowReport {
    pub index: u32,
    pub accepted: u32,
    pub rejected: u32,
    pub captured: u32,
    pub overwritten: u32,
    pub flush: FlushSummary,
}

pub struct Collector<const N: usize> {
    classifier: Classifier,
    histogram: Box<Histogram<N>>,
    window: CollectionWindow,
    emitter: ReportEmitter,
    accepted: u32,
    rejected: u32,
}

impl<const N: usize> Collector<N> {
    /// Zeroed histogram and a first window opened at `now`.
    ///
    /// # Panics
    ///
    /// If the classifier's bin count differs from `N`.
    pub fn new(classifier: Classifier, window_ticks: u32, emitter: ReportEmitter, now: u32) -> Self {
        assert_eq!(classifier.bin_count(), N, "classifier and histogram disagree on bin count");
        Self {
            classifier,
            histogram: Box::new(Histogram::new()),
            window: CollectionWindow::open(now, window_ticks),
            emitter,
            accepted: 0,
            rejected: 0,
        }
    }

    /// Classify one captured address and apply it.  Returns whether it was
    /// counted.
    pub fn apply(&mut self, raw_address: NonZeroU32) -> bool {
        let counted = self
            .classifier
            .classify(raw_address.get())
            .is_some_and(|bin| self.histogram.increment(bin));

        if counted {
            self.accepted += 1;
        } else {
            self.rejected += 1;
        }
        counted
    }

    /// Handle one wake-up.  Returns the window summary when a flush happened.
    pub fn step<W: Wake, K: TickSource + ?Sized>(
        &mut self,
        profiler: &Profiler<W>,
        ticks: &K,
    ) -> Option<WindowReport> {
        if let Some(raw) = profiler.drain() {
            self.apply(raw);
        }

        match self.window.poll(ticks.now()) {
            WindowState::Collecting => None,
            WindowState::DoneCollecting => Some(self.finish_window(profiler, ticks)),
        }
    }

    fn finish_window<W: Wake, K: TickSource + ?Sized>(
        &mut self,
        profiler: &Profiler<W>,
        ticks: &K,
    ) -> WindowReport {
        let flush = self.emitter.flush(self.histogram.as_ref(), ticks);
        let counts = profiler.take_counts();

        let report = WindowReport {
            index: self.window.index(),
            accepted: self.accepted,
            rejected: self.rejected,
            captured: counts.captured,
            overwritten: counts.overwritten,
            flush,
        };

        self.histogram.reset();
        self.accepted = 0;
        self.rejected = 0;
        self.window.restart(ticks.now());

        report
    }

    pub fn histogram(&self) -> &Histogram<N> {
        &self.histogram
    }

    pub fn window(&self) -> &CollectionWindow {
        &self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ReportRecord;
    use crate::profiler::wake::BinarySemaphore;
    use std::cell::Cell;
    use std::sync::mpsc::{self, Receiver};

    struct ManualTicks(Cell<u32>);

    impl TickSource for ManualTicks {
        fn now(&self) -> u32 {
            self.0.get()
        }
    }

    const WINDOW: u32 = 100;

    fn setup() -> (Profiler<BinarySemaphore>, Collector<512>, Receiver<ReportRecord>) {
        let (tx, rx) = mpsc::sync_channel(1024);
        let collector = Collector::new(
            Classifier::new(1 << 15, 512),
            WINDOW,
            ReportEmitter::new(tx),
            0,
        );
        (Profiler::new(BinarySemaphore::new()), collector, rx)
    }

    #[test]
    fn accepted_samples_sum_to_histogram_total() {
        let (profiler, mut collector, _rx) = setup();
        let ticks = ManualTicks(Cell::new(0));

        for address in [0x40u32, 0x41, 0x1000, 0x7FFF, 0x8000, 0x4200_0000] {
            profiler.deposit(address);
            assert!(collector.step(&profiler, &ticks).is_none());
        }

        assert_eq!(collector.histogram().total(), 4);
        assert_eq!(collector.histogram().get(1), Some(2));
        assert_eq!(collector.histogram().get(0x1000 >> 6), Some(1));
        assert_eq!(collector.histogram().get(511), Some(1));
    }

    #[test]
    fn out_of_range_sample_leaves_histogram_untouched() {
        let (profiler, mut collector, _rx) = setup();
        let ticks = ManualTicks(Cell::new(0));

        profiler.deposit(1 << 15);
        collector.step(&profiler, &ticks);

        assert_eq!(collector.histogram().total(), 0);
    }

    #[test]
    fn overwritten_sample_is_counted_once() {
        let (profiler, mut collector, _rx) = setup();
        let ticks = ManualTicks(Cell::new(0));

        profiler.deposit(0x100);
        profiler.deposit(0x200);
        collector.step(&profiler, &ticks);
        collector.step(&profiler, &ticks);

        let hist = collector.histogram();
        assert_eq!(hist.total(), 1);
        assert_eq!(hist.get(0x200 >> 6), Some(1));
        assert_eq!(hist.get(0x100 >> 6), Some(0));
    }

    #[test]
    fn window_expiry_flushes_and_restarts() {
        let (profiler, mut collector, rx) = setup();
        let ticks = ManualTicks(Cell::new(0));

        for _ in 0..3 {
            profiler.deposit(7 << 6);
            collector.step(&profiler, &ticks);
        }
        profiler.deposit(0);
        collector.step(&profiler, &ticks);

        ticks.0.set(WINDOW);
        assert!(collector.step(&profiler, &ticks).is_none());

        ticks.0.set(WINDOW + 1);
        let report = collector.step(&profiler, &ticks).expect("window should flush");
        assert_eq!(report.index, 0);
        assert_eq!(report.accepted, 3);
        assert_eq!(report.rejected, 0);
        assert_eq!(report.captured, 4);
        assert_eq!(report.overwritten, 0);
        assert_eq!(report.flush, FlushSummary { sent: 512, dropped: 0 });

        let records: Vec<ReportRecord> = rx.try_iter().collect();
        assert_eq!(records.len(), 512);
        assert_eq!(records[7].count(), 3);
        assert_eq!(records.iter().map(|r| r.count() as u64).sum::<u64>(), 3);

        assert_eq!(collector.histogram().total(), 0);
        assert_eq!(collector.window().index(), 1);
        assert_eq!(collector.window().start_tick(), WINDOW + 1);
    }

    #[test]
    fn consecutive_windows_are_independent() {
        let (profiler, mut collector, rx) = setup();
        let ticks = ManualTicks(Cell::new(0));

        profiler.deposit(3 << 6);
        collector.step(&profiler, &ticks);
        ticks.0.set(WINDOW + 1);
        collector.step(&profiler, &ticks).expect("first flush");

        profiler.deposit(9 << 6);
        collector.step(&profiler, &ticks);
        ticks.0.set(2 * WINDOW + 2);
        let second = collector.step(&profiler, &ticks).expect("second flush");
        assert_eq!(second.index, 1);
        assert_eq!(second.accepted, 1);

        let records: Vec<ReportRecord> = rx.try_iter().collect();
        assert_eq!(records.len(), 1024);
        let (first, second) = records.split_at(512);
        assert_eq!(first[3].count(), 1);
        assert_eq!(first[9].count(), 0);
        assert_eq!(second[3].count(), 0);
        assert_eq!(second[9].count(), 1);
    }

    #[test]
    #[should_panic(expected = "bin count")]
    fn rejects_mismatched_bin_count() {
        let (tx, _rx) = mpsc::sync_channel(1);
        let _ = Collector::<256>::new(Classifier::new(1 << 15, 512), WINDOW, ReportEmitter::new(tx), 0);
    }
}
