// PC Trace — Report Emitter
//
// Drains the histogram into the outbound report queue, one record per bin in
// ascending bin order.  Sends never block: a full (or closed) queue drops the
// record and collection carries on.

use std::sync::mpsc::{SyncSender, TrySendError};

use crate::drivers::ticks::TickSource;
use crate::events::ReportRecord;
use crate::profiler::histogram::Histogram;

/// Outcome of one flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlushSummary {
    pub sent: u32,
    pub dropped: u32,
}

pub struct ReportEmitter {
    tx: SyncSender<ReportRecord>,
}

impl ReportEmitter {
    pub fn new(tx: SyncSender<ReportRecord>) -> Self {
        Self { tx }
    }

    /// Emit every bin of `histogram`.  Each record is stamped with the tick
    /// at which it was built.
    pub fn flush<const N: usize, K: TickSource + ?Sized>(
        &self,
        histogram: &Histogram<N>,
        ticks: &K,
    ) -> FlushSummary {
        let mut summary = FlushSummary::default();

        for (bin, count) in histogram.snapshot() {
            let record = ReportRecord::histogram_bin(ticks.now(), bin, count);
            match self.tx.try_send(record) {
                Ok(()) => summary.sent += 1,
                Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                    summary.dropped += 1;
                }
            }
        }

        summary
    }
}
