use std::time::Duration;

/// One tick's worth of work, as seen by the rendering thread.
///
/// The timestamp comes from the rendering clock; the cycle counters are
/// cumulative values read from the cycle-time source at the same moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    timestamp:      Duration,
    frame_count:    u32,
    process_cycles: u64,
    idle_cycles:    u64,
}

impl Sample {
    pub fn new(
        timestamp: Duration,
        frame_count: u32,
        process_cycles: u64,
        idle_cycles: u64,
    ) -> Self {
        Self {
            timestamp,
            frame_count,
            process_cycles,
            idle_cycles,
        }
    }

    /// Rendering-clock time at which the sample was taken.
    pub fn timestamp(&self) -> Duration {
        self.timestamp
    }

    /// Frames covered by this sample (1 unless ticks were coalesced).
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn process_cycles(&self) -> u64 {
        self.process_cycles
    }

    pub fn idle_cycles(&self) -> u64 {
        self.idle_cycles
    }
}
