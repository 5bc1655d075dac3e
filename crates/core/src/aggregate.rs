use crate::{sample::Sample, window::SampleWindow};

/// Rates derived from the span between the earliest and latest sample in a
/// window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowAggregate {
    pub fps:                f64,
    pub process_cycle_time: u64,
    pub idle_cycle_time:    u64,
}

/// Scan `window` and derive frame rate and cycle deltas.
///
/// Returns `None` when the window holds no samples or when every sample
/// shares one timestamp (zero span, so no rate can be computed).
///
/// The earliest and latest samples are found by comparing timestamps, not
/// by slot position.
pub fn aggregate(window: &SampleWindow) -> Option<WindowAggregate> {
    let mut earliest: Option<&Sample> = None;
    let mut latest: Option<&Sample> = None;
    let mut total_frames: u64 = 0;

    for sample in window.iter() {
        // Strict comparisons: the first sample seen wins a tie.
        if earliest.map_or(true, |e| sample.timestamp() < e.timestamp()) {
            earliest = Some(sample);
        }
        if latest.map_or(true, |l| sample.timestamp() > l.timestamp()) {
            latest = Some(sample);
        }
        total_frames += u64::from(sample.frame_count());
    }

    let (earliest, latest) = (earliest?, latest?);
    let elapsed = (latest.timestamp() - earliest.timestamp()).as_secs_f64();
    if elapsed == 0.0 {
        return None;
    }

    Some(WindowAggregate {
        fps:                total_frames as f64 / elapsed,
        process_cycle_time: latest.process_cycles().saturating_sub(earliest.process_cycles()),
        idle_cycle_time:    latest.idle_cycles().saturating_sub(earliest.idle_cycles()),
    })
}
