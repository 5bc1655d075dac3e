use thiserror::Error;

/// Top-level error type used across the sampler workspace.
#[derive(Debug, Error)]
pub enum PerfError {
    #[error("config error: {0}")]
    Config(String),

    /// The cycle-time source could not produce a reading.
    #[error("cycle-time query failed: {0}")]
    CycleTime(String),
}

pub type Result<T, E = PerfError> = std::result::Result<T, E>;
