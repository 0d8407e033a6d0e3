// PC Trace — Hardware & Profiler Configuration
// Target: Seeed Studio Xiao ESP32-C3 (RISC-V)

// ---------------------------------------------------------------------------
// Sampling Timer (timer group 0, timer 0)
// ---------------------------------------------------------------------------
// period = prescale × load / source clock
//        = 80 × 10_000 / 80 MHz = 10 ms  →  100 Hz
pub const TIMER_SOURCE_HZ: u32 = 80_000_000; // APB clock
pub const TIMER_PRESCALE: u32 = 80;          // 1 MHz counter
pub const TIMER_LOAD: u32 = 10_000;          // counts per period

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------
pub const BIN_COUNT: usize = 512;
pub const MAX_ADDRESS: u32 = 1 << 15;        // 32 KiB tracked region
pub const BIN_SHIFT: u32 = (MAX_ADDRESS / BIN_COUNT as u32).trailing_zeros(); // 64-byte bins

// Captured PCs are rebased onto the start of the flash-mapped code region
// before they reach the classifier.
pub const CODE_REGION_BASE: u32 = 0x4200_0000;

// Word offset from the timer callback's stack pointer to the interrupted
// return address.  Assumed, not measured: `return_address` reads relative to
// the callback's `sp`, not the saved interrupt frame, so this must be checked
// on hardware for the build's opt-level and ESP-IDF version.
pub const PC_STACK_OFFSET: usize = 8;

// ---------------------------------------------------------------------------
// Collection Window
// ---------------------------------------------------------------------------
pub const TICK_RATE_HZ: u32 = 100;           // CONFIG_FREERTOS_HZ default
pub const WINDOW_DURATION_S: u32 = 60;
pub const WINDOW_DURATION_TICKS: u32 = WINDOW_DURATION_S * TICK_RATE_HZ;

// ---------------------------------------------------------------------------
// Reporting
// ---------------------------------------------------------------------------
pub const REPORT_QUEUE_DEPTH: usize = BIN_COUNT; // one whole flush fits

// ---------------------------------------------------------------------------
// Task Stack Sizes (bytes)
// ---------------------------------------------------------------------------
pub const STACK_TRACE: usize = 8192;
pub const STACK_REPORT: usize = 4096;
pub const STACK_SIM_TIMER: usize = 4096;

const _: () = {
    assert!(BIN_COUNT.is_power_of_two());
    assert!(MAX_ADDRESS.is_power_of_two());
    assert!(MAX_ADDRESS as usize >= BIN_COUNT);
    // A full window at 100 Hz must not be able to saturate a 32-bit bin.
    assert!((WINDOW_DURATION_S as u64) * (TIMER_SOURCE_HZ as u64)
        / (TIMER_PRESCALE as u64 * TIMER_LOAD as u64)
        < u32::MAX as u64);
};
