// PC Trace — Program Trace Task
//
// Arms the sampling timer, then runs the collection loop forever:
// park on the wake signal (no timeout) → `Collector::step()` → log the window
// summary whenever a flush happened.
//
// If the timer interrupt never fires the task parks forever.  That is a
// configuration error, not a runtime path.

use crate::config::*;
use crate::drivers::ticks::TickSource;
use crate::drivers::timer::{IsrHandler, SampleTimer, TimerPeriod};
use crate::profiler::collector::{Collector, WindowReport};
use crate::profiler::wake::{Park, Wake};
use crate::profiler::Profiler;

/// Configure and start `timer` so every expiry deposits `capture()` into
/// `profiler`.
pub fn arm_timer<T, W, C>(
    timer: &mut T,
    profiler: &'static Profiler<W>,
    mut capture: C,
) -> anyhow::Result<()>
where
    T: SampleTimer,
    W: Wake + 'static,
    C: FnMut() -> u32 + Send + 'static,
{
    let period = TimerPeriod::SAMPLE;
    let handler: IsrHandler = Box::new(move || profiler.deposit(capture()));
    timer.start(period, handler)?;

    log::info!(
        "Sampling at {} Hz, {} bins × {} B, window {} ticks",
        period.rate_hz(TIMER_SOURCE_HZ),
        BIN_COUNT,
        1u32 << BIN_SHIFT,
        WINDOW_DURATION_TICKS
    );
    Ok(())
}

pub fn trace_task<W, P, K, const N: usize>(
    profiler: &Profiler<W>,
    parker: &P,
    ticks: &K,
    mut collector: Collector<N>,
) -> !
where
    W: Wake,
    P: Park + ?Sized,
    K: TickSource + ?Sized,
{
    log::info!("Trace task started");

    loop {
        parker.park();

        if let Some(report) = collector.step(profiler, ticks) {
            log_window(&report);
        }
    }
}

fn log_window(report: &WindowReport) {
    log::info!(
        "Window {} done: accepted={} rejected={} captured={} overwritten={} sent={} dropped={}",
        report.index,
        report.accepted,
        report.rejected,
        report.captured,
        report.overwritten,
        report.flush.sent,
        report.flush.dropped
    );
    if report.flush.dropped > 0 {
        log::warn!(
            "Window {}: report queue full, {} records dropped",
            report.index,
            report.flush.dropped
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::profiler::report::FlushSummary;

    struct CaptureLogger(Mutex<Vec<(log::Level, String)>>);

    impl log::Log for CaptureLogger {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.level() <= log::Level::Info
        }

        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                self.0.lock().unwrap().push((record.level(), record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: CaptureLogger = CaptureLogger(Mutex::new(Vec::new()));

    #[test]
    fn window_summary_carries_every_count_at_info() {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Info);

        log_window(&WindowReport {
            index: 77,
            accepted: 10,
            rejected: 1,
            captured: 20,
            overwritten: 9,
            flush: FlushSummary { sent: 500, dropped: 12 },
        });

        let lines: Vec<_> = LOGGER
            .0
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, line)| line.starts_with("Window 77"))
            .cloned()
            .collect();

        let (level, summary) = &lines[0];
        assert_eq!(*level, log::Level::Info);
        for field in [
            "accepted=10",
            "rejected=1",
            "captured=20",
            "overwritten=9",
            "sent=500",
            "dropped=12",
        ] {
            assert!(summary.contains(field), "{field} missing from {summary:?}");
        }
        assert!(lines
            .iter()
            .any(|(level, line)| *level == log::Level::Warn && line.contains("12 records dropped")));
    }
}
