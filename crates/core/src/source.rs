use crate::error::Result;

/// Supplier of cumulative CPU cycle counters.
///
/// Both readings must be monotonically non-decreasing across calls and share
/// one unit, since the sampler only ever compares them against each other.
pub trait CycleTimeSource {
    /// Cycles consumed by the calling process since it started.
    fn process_cycles(&mut self) -> Result<u64>;

    /// Idle cycles for each of the first `count` logical processors.
    fn idle_cycles_per_processor(&mut self, count: usize) -> Result<Vec<u64>>;
}

impl<S: CycleTimeSource + ?Sized> CycleTimeSource for Box<S> {
    fn process_cycles(&mut self) -> Result<u64> {
        (**self).process_cycles()
    }

    fn idle_cycles_per_processor(&mut self, count: usize) -> Result<Vec<u64>> {
        (**self).idle_cycles_per_processor(count)
    }
}
