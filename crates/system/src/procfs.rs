use std::path::{Path, PathBuf};
use uiperf_core::{CycleTimeSource, PerfError, Result};

/// Linux cycle-time source backed by procfs.
///
/// Process time is `utime + stime` from `/proc/self/stat`; idle time is the
/// `idle` column of each `cpuN` line in `/proc/stat`. Both are in kernel
/// clock ticks, which is good enough for the ratios the sampler derives.
#[derive(Debug, Clone)]
pub struct ProcCycleSource {
    process_stat: PathBuf,
    system_stat:  PathBuf,
}

impl ProcCycleSource {
    pub fn new() -> Self {
        Self {
            process_stat: PathBuf::from("/proc/self/stat"),
            system_stat:  PathBuf::from("/proc/stat"),
        }
    }

    fn read(path: &Path) -> Result<String> {
        std::fs::read_to_string(path)
            .map_err(|e| PerfError::CycleTime(format!("cannot read '{}': {e}", path.display())))
    }
}

impl Default for ProcCycleSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleTimeSource for ProcCycleSource {
    fn process_cycles(&mut self) -> Result<u64> {
        parse_process_stat(&Self::read(&self.process_stat)?)
    }

    fn idle_cycles_per_processor(&mut self, count: usize) -> Result<Vec<u64>> {
        parse_idle_per_cpu(&Self::read(&self.system_stat)?, count)
    }
}

/// Extract `utime + stime` from a `/proc/<pid>/stat` line.
///
/// The command name sits in parentheses and may itself contain spaces or
/// parentheses, so fields are counted from the last `)`.
pub fn parse_process_stat(raw: &str) -> Result<u64> {
    let rest = raw
        .rfind(')')
        .map(|i| &raw[i + 1..])
        .ok_or_else(|| PerfError::CycleTime("malformed process stat: no ')'".into()))?;

    // Fields after the command: state(3) ppid(4) ... utime(14) stime(15).
    let fields: Vec<&str> = rest.split_whitespace().collect();
    let field = |idx: usize, name: &str| -> Result<u64> {
        fields
            .get(idx)
            .and_then(|s| s.parse::<u64>().ok())
            .ok_or_else(|| PerfError::CycleTime(format!("malformed process stat: bad {name}")))
    };

    Ok(field(11, "utime")?.saturating_add(field(12, "stime")?))
}

/// Extract the idle column for `cpu0 .. cpu{count-1}` from `/proc/stat`.
pub fn parse_idle_per_cpu(raw: &str, count: usize) -> Result<Vec<u64>> {
    let mut idle: Vec<Option<u64>> = vec![None; count];

    for line in raw.lines() {
        let mut parts = line.split_whitespace();
        let Some(label) = parts.next() else {
            continue;
        };
        // Skip the aggregate "cpu" line and anything that isn't "cpuN".
        let Some(index) = label
            .strip_prefix("cpu")
            .and_then(|n| n.parse::<usize>().ok())
        else {
            continue;
        };
        if index >= count {
            continue;
        }

        // user nice system idle ...
        let value = parts
            .nth(3)
            .and_then(|s| s.parse::<u64>().ok())
            .ok_or_else(|| PerfError::CycleTime(format!("malformed /proc/stat line for {label}")))?;
        idle[index] = Some(value);
    }

    idle.into_iter()
        .enumerate()
        .map(|(i, v)| v.ok_or_else(|| PerfError::CycleTime(format!("no idle time for cpu{i}"))))
        .collect()
}
