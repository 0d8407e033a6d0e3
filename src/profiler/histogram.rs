// PC Trace — Histogram Store
//
// Fixed array of per-bin counters.  Only the trace task writes to it; the
// interrupt handler never touches the store, so no locking is needed.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram<const N: usize> {
    bins: [u32; N],
}

impl<const N: usize> Histogram<N> {
    pub const fn new() -> Self {
        Self { bins: [0; N] }
    }

    /// Saturating increment.  Returns `false` if `bin` is out of range.
    #[inline]
    pub fn increment(&mut self, bin: usize) -> bool {
        match self.bins.get_mut(bin) {
            Some(count) => {
                *count = count.saturating_add(1);
                true
            }
            None => false,
        }
    }

    /// Zero every bin.
    pub fn reset(&mut self) {
        self.bins.fill(0);
    }

    pub fn get(&self, bin: usize) -> Option<u32> {
        self.bins.get(bin).copied()
    }

    /// Sum of all bins.
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|&c| c as u64).sum()
    }

    /// `(bin_index, count)` pairs in ascending bin order.
    pub fn snapshot(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.bins.iter().copied().enumerate()
    }
}

impl<const N: usize> Default for Histogram<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increments_single_bin() {
        let mut hist = Histogram::<512>::new();
        assert!(hist.increment(7));
        assert!(hist.increment(7));
        assert!(hist.increment(7));

        assert_eq!(hist.get(7), Some(3));
        assert_eq!(hist.total(), 3);
        assert!(hist.snapshot().filter(|&(i, _)| i != 7).all(|(_, c)| c == 0));
    }

    #[test]
    fn out_of_range_bin_is_rejected() {
        let mut hist = Histogram::<8>::new();
        assert!(!hist.increment(8));
        assert_eq!(hist.total(), 0);
        assert_eq!(hist.get(8), None);
    }

    #[test]
    fn saturates_instead_of_wrapping() {
        let mut hist = Histogram::<4>::new();
        hist.bins[2] = u32::MAX - 1;
        hist.increment(2);
        hist.increment(2);
        assert_eq!(hist.get(2), Some(u32::MAX));
    }

    #[test]
    fn reset_then_snapshot_is_all_zero() {
        let mut hist = Histogram::<64>::new();
        for bin in 0..64 {
            for _ in 0..=bin {
                hist.increment(bin);
            }
        }
        hist.reset();

        assert_eq!(hist.snapshot().count(), 64);
        assert!(hist.snapshot().all(|(_, c)| c == 0));
        assert_eq!(hist.total(), 0);
    }

    #[test]
    fn snapshot_is_in_ascending_bin_order() {
        let mut hist = Histogram::<16>::new();
        hist.increment(15);
        hist.increment(0);

        let indices: Vec<usize> = hist.snapshot().map(|(i, _)| i).collect();
        assert_eq!(indices, (0..16).collect::<Vec<_>>());
    }
}
