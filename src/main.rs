// PC Trace — Firmware Entry Point
//
// Boot sequence:
//   1. Initialise logging and take the peripherals.
//   2. Create the bounded report queue and spawn the report task (CSV to the
//      UART console).
//   3. Spawn the trace task, which arms timer group 0 at 100 Hz and then
//      collects 60-second PC histograms forever.
//
// On a host build the same pipeline runs against a simulated timer that
// produces synthetic program counters.

use pctrace::config::*;
use pctrace::drivers::ticks::TickSource;
use pctrace::profiler::classifier::Classifier;
use pctrace::profiler::collector::Collector;
use pctrace::profiler::report::ReportEmitter;

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    firmware::run()
}

#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    host::run()
}

/// Collector wired to the configured bins and window, first window opening now.
fn new_collector<K: TickSource>(
    ticks: &K,
    report_tx: std::sync::mpsc::SyncSender<pctrace::events::ReportRecord>,
) -> Collector<BIN_COUNT> {
    const CLASSIFIER: Classifier = Classifier::new(MAX_ADDRESS, BIN_COUNT);
    Collector::new(
        CLASSIFIER,
        WINDOW_DURATION_TICKS,
        ReportEmitter::new(report_tx),
        ticks.now(),
    )
}

// ---------------------------------------------------------------------------
// Device
// ---------------------------------------------------------------------------
#[cfg(target_os = "espidf")]
mod firmware {
    use std::sync::mpsc::{self, SyncSender};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use esp_idf_hal::prelude::*;
    use esp_idf_hal::task::notification::{Notification, Notifier};

    use pctrace::config::*;
    use pctrace::drivers::esp_timer::HwSampleTimer;
    use pctrace::drivers::stack;
    use pctrace::drivers::ticks::FreeRtosTicks;
    use pctrace::events::ReportRecord;
    use pctrace::profiler::Profiler;
    use pctrace::tasks::report::{report_task, OutputFormat};
    use pctrace::tasks::trace::{arm_timer, trace_task};

    pub fn run() -> anyhow::Result<()> {
        // Link esp-idf-sys runtime patches and initialise logging.
        esp_idf_svc::sys::link_patches();
        esp_idf_svc::log::EspLogger::initialize_default();
        log::info!("PC trace firmware starting…");

        let peripherals = Peripherals::take()?;

        // ---- Report queue -------------------------------------------------
        let (report_tx, report_rx) = mpsc::sync_channel(REPORT_QUEUE_DEPTH);

        thread::Builder::new()
            .name("report".into())
            .stack_size(STACK_REPORT)
            .spawn(move || {
                report_task(report_rx, OutputFormat::ExcelCsv, std::io::stdout());
            })?;

        // ---- Trace task ---------------------------------------------------
        let mut timer = HwSampleTimer::new(peripherals.timer00);
        thread::Builder::new()
            .name("trace".into())
            .stack_size(STACK_TRACE)
            .spawn(move || {
                if let Err(e) = start_trace(&mut timer, report_tx) {
                    log::error!("Trace task setup failed: {:#}", e);
                }
            })?;

        // Main thread has nothing left to do — park it forever.
        loop {
            thread::sleep(Duration::from_secs(60));
        }
    }

    fn start_trace(
        timer: &mut HwSampleTimer,
        report_tx: SyncSender<ReportRecord>,
    ) -> anyhow::Result<()> {
        // The notification belongs to the task that waits on it, so it has
        // to be created here rather than in `run()`.
        let notification = Notification::new();
        let profiler: &'static Profiler<Arc<Notifier>> =
            Box::leak(Box::new(Profiler::new(notification.notifier())));

        let ticks = FreeRtosTicks;
        let collector = super::new_collector(&ticks, report_tx);

        arm_timer(timer, profiler, || {
            // SAFETY: a small word offset stays inside the callback's stack.  Whether
            // it lands on the interrupted PC is unverified, see PC_STACK_OFFSET.
            let pc = unsafe { stack::return_address(PC_STACK_OFFSET) };
            pc.wrapping_sub(CODE_REGION_BASE)
        })?;

        trace_task(profiler, &notification, &ticks, collector)
    }
}

// ---------------------------------------------------------------------------
// Host simulation
// ---------------------------------------------------------------------------
#[cfg(not(target_os = "espidf"))]
mod host {
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use anyhow::anyhow;

    use pctrace::config::*;
    use pctrace::drivers::ticks::InstantTicks;
    use pctrace::drivers::timer::{SimulatedTimer, TimerPeriod};
    use pctrace::profiler::wake::BinarySemaphore;
    use pctrace::profiler::Profiler;
    use pctrace::tasks::report::{report_task, OutputFormat};
    use pctrace::tasks::trace::{arm_timer, trace_task};

    struct StderrLogger;

    impl log::Log for StderrLogger {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                eprintln!("{} {}: {}", record.level(), record.target(), record.args());
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: StderrLogger = StderrLogger;

    pub fn run() -> anyhow::Result<()> {
        log::set_logger(&LOGGER).map_err(|e| anyhow!("logger init: {e}"))?;
        log::set_max_level(log::LevelFilter::Info);
        log::info!("PC trace simulation starting…");

        let (report_tx, report_rx) = mpsc::sync_channel(REPORT_QUEUE_DEPTH);
        thread::Builder::new()
            .name("report".into())
            .stack_size(STACK_REPORT)
            .spawn(move || {
                report_task(report_rx, OutputFormat::ExcelCsv, std::io::stdout());
            })?;

        let semaphore = Arc::new(BinarySemaphore::new());
        let profiler: &'static Profiler<Arc<BinarySemaphore>> =
            Box::leak(Box::new(Profiler::new(Arc::clone(&semaphore))));

        let ticks = InstantTicks::new(TICK_RATE_HZ);
        let collector = super::new_collector(&ticks, report_tx);

        let mut timer = SimulatedTimer::new();
        arm_timer(&mut timer, profiler, synthetic_pc())?;

        let period = Duration::from_micros(TimerPeriod::SAMPLE.period_us(TIMER_SOURCE_HZ));
        thread::Builder::new()
            .name("timer".into())
            .stack_size(STACK_SIM_TIMER)
            .spawn(move || loop {
                thread::sleep(period);
                timer.fire();
            })?;

        trace_task(profiler, semaphore.as_ref(), &ticks, collector)
    }

    /// Xorshift program counters: most land in a hot 512-byte loop, the rest
    /// spread over twice the tracked range so some fall outside it.
    fn synthetic_pc() -> impl FnMut() -> u32 + Send + 'static {
        let mut state = 0x2545_F491u32;
        move || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            if state % 10 < 7 {
                0x0400 + state % 0x200
            } else {
                state % (MAX_ADDRESS * 2)
            }
        }
    }
}
