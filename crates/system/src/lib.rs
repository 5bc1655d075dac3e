pub mod procfs;

pub use procfs::ProcCycleSource;

use sysinfo::{CpuRefreshKind, RefreshKind, System};

/// Number of logical processors, queried once at startup.
///
/// Falls back to the standard library's parallelism hint if `sysinfo`
/// reports no CPUs; never returns 0.
pub fn processor_count() -> usize {
    let sys = System::new_with_specifics(
        RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing()),
    );
    let count = sys.cpus().len();
    if count > 0 {
        return count;
    }

    tracing::warn!("sysinfo reported no CPUs; falling back to available_parallelism");
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
