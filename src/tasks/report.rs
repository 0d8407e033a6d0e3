// PC Trace — Report Data Task
//
// Drains the outbound report queue and writes each record to the console.
// Producers never wait on this task; it simply prints whatever made it into
// the queue.

use std::fmt::Write as _;
use std::io::Write;
use std::sync::mpsc::Receiver;

use crate::events::ReportRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Header line, then one comma-separated line per record.
    ExcelCsv,
    /// Human-readable single line per record.
    Text,
}

pub const CSV_HEADER: &str = "timestamp,report_kind,value_type_flags,value0,value1,value2,value3";

/// Render one record (without trailing newline).
pub fn format_record(record: &ReportRecord, format: OutputFormat) -> String {
    let mut line = String::with_capacity(64);

    match format {
        OutputFormat::ExcelCsv => {
            let _ = write!(
                line,
                "{},{},{}",
                record.timestamp,
                record.kind.code(),
                record.value_type.bits()
            );
            for slot in 0..ReportRecord::VALUE_SLOTS {
                line.push(',');
                push_value(&mut line, record, slot);
            }
        }
        OutputFormat::Text => {
            let _ = write!(line, "[{:>10}] {}:", record.timestamp, record.kind.display_name());
            for slot in 0..ReportRecord::VALUE_SLOTS {
                line.push(' ');
                push_value(&mut line, record, slot);
            }
        }
    }

    line
}

fn push_value(line: &mut String, record: &ReportRecord, slot: usize) {
    let raw = record.values[slot];
    if record.value_type.is_float(slot) {
        let _ = write!(line, "{}", f32::from_bits(raw));
    } else {
        let _ = write!(line, "{}", raw);
    }
}

/// Runs until every sender has been dropped.
pub fn report_task<W: Write>(report_rx: Receiver<ReportRecord>, format: OutputFormat, mut out: W) {
    log::info!("Report task started ({:?})", format);

    if format == OutputFormat::ExcelCsv {
        if let Err(e) = writeln!(out, "{}", CSV_HEADER) {
            log::warn!("Report header write failed: {}", e);
        }
    }

    for record in report_rx.iter() {
        if let Err(e) = writeln!(out, "{}", format_record(&record, format)) {
            log::warn!("Report write failed: {}", e);
        }
    }

    let _ = out.flush();
    log::warn!("Report channel closed — exiting report task");
}
