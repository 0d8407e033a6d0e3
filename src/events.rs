// PC Trace — Report Records

// ---------------------------------------------------------------------------
// Report Kind — tag telling the console which producer built a record
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// One histogram bin: value 0 = bin index, value 1 = count.
    ProgramTrace,
}

impl ReportKind {
    /// Numeric tag written to the report stream.
    pub fn code(&self) -> u16 {
        match self {
            Self::ProgramTrace => 42,
        }
    }

    /// Human-readable label (used by the plain-text output format).
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ProgramTrace => "trace",
        }
    }
}

// ---------------------------------------------------------------------------
// Value Type Flags — bit i set means slot i carries an f32 bit pattern
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValueTypeFlags(u8);

impl ValueTypeFlags {
    /// All four slots are plain unsigned integers.
    pub const INTEGERS: Self = Self(0);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0x0F)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub const fn is_float(&self, slot: usize) -> bool {
        slot < ReportRecord::VALUE_SLOTS && self.0 & (1 << slot) != 0
    }
}

// ---------------------------------------------------------------------------
// Report Record — one entry on the outbound report queue
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRecord {
    /// Scheduler tick at which the record was built.
    pub timestamp: u32,
    pub kind: ReportKind,
    pub value_type: ValueTypeFlags,
    pub values: [u32; ReportRecord::VALUE_SLOTS],
}

impl ReportRecord {
    pub const VALUE_SLOTS: usize = 4;

    /// Record for one histogram bin.
    pub fn histogram_bin(timestamp: u32, bin: usize, count: u32) -> Self {
        Self {
            timestamp,
            kind: ReportKind::ProgramTrace,
            value_type: ValueTypeFlags::INTEGERS,
            values: [bin as u32, count, 0, 0],
        }
    }

    pub fn bin(&self) -> u32 {
        self.values[0]
    }

    pub fn count(&self) -> u32 {
        self.values[1]
    }
}
