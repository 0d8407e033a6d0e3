// PC Trace — Statistical Program-Counter Profiler
//
// A periodic timer interrupt captures the interrupted return address and
// hands it to the trace task through a single-slot signal.  The task bins
// the address into a fixed histogram and, once per collection window, flushes
// every bin onto a bounded report queue for the console task to print.
//
//   timer ISR ──deposit──▶ Profiler (signal + wake) ──drain──▶ trace task
//                                                               │ Collector
//                                                               ▼
//                                  report task ◀── sync_channel (try_send)

pub mod config;
pub mod drivers;
pub mod events;
pub mod profiler;
pub mod tasks;
