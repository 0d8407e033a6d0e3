// PC Trace — Sample Classifier
//
// Maps a raw (rebased) address onto a histogram bin: `bin = address >> shift`
// with `shift = log2(max_address / bin_count)`.  Addresses outside
// `(0, max_address)` are discarded silently; the tracked range depends on the
// link-time layout, so undercounting is preferred over faulting.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classifier {
    max_address: u32,
    bin_count: usize,
    shift: u32,
}

impl Classifier {
    /// # Panics
    ///
    /// If `max_address` or `bin_count` is not a power of two, or there are
    /// more bins than addresses.  Evaluated at compile time for `const` use.
    pub const fn new(max_address: u32, bin_count: usize) -> Self {
        assert!(max_address.is_power_of_two(), "max_address must be a power of two");
        assert!(bin_count.is_power_of_two(), "bin_count must be a power of two");
        assert!(bin_count <= max_address as usize, "more bins than addresses");

        Self {
            max_address,
            bin_count,
            shift: (max_address / bin_count as u32).trailing_zeros(),
        }
    }

    /// Bin index for `address`, or `None` when the sample must be discarded.
    #[inline]
    pub fn classify(&self, address: u32) -> Option<usize> {
        if address == 0 || address >= self.max_address {
            return None;
        }
        Some((address >> self.shift) as usize)
    }

    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    pub fn shift(&self) -> u32 {
        self.shift
    }

    /// Size in bytes of the address range covered by one bin.
    pub fn bin_width(&self) -> u32 {
        1 << self.shift
    }
}
