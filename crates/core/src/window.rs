use crate::sample::Sample;

/// Window size used when nothing else is configured.
pub const DEFAULT_CAPACITY: usize = 10;

/// Fixed-capacity FIFO of sample slots.
///
/// Slots start out empty and fill up one per push; once full, every push
/// evicts the slot at position 0. The slot vector always has exactly
/// `capacity` entries.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    slots: Vec<Option<Sample>>,
}

impl SampleWindow {
    /// Create an empty window. A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity.max(1)],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Change the capacity, discarding every held sample.
    ///
    /// Returns `false` (and keeps history) when the clamped capacity equals
    /// the current one.
    pub fn resize(&mut self, capacity: usize) -> bool {
        let capacity = capacity.max(1);
        if capacity == self.slots.len() {
            return false;
        }
        self.slots.clear();
        self.slots.resize(capacity, None);
        true
    }

    /// Append `sample` at the new end, dropping the slot at position 0.
    pub fn push(&mut self, sample: Sample) {
        self.slots.remove(0);
        self.slots.push(Some(sample));
    }

    /// Non-empty samples currently held. Callers must not rely on the order.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.slots.iter().flatten()
    }

    /// Number of non-empty slots.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// `true` once every slot holds a sample.
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
