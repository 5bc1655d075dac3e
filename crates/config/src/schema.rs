use serde::{Deserialize, Serialize};

/// Root configuration structure parsed from `uiperf.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PerfConfig {
    /// Sample window settings.
    pub sampler: SamplerConfig,
    /// Simulated rendering clock.
    pub clock: ClockConfig,
    /// Periodic reporting of the current metrics.
    pub report: ReportConfig,
}

/// Sample window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Window capacity; values below 1 are raised to 1 by the sampler.
    pub number_of_samples: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            number_of_samples: uiperf_core::DEFAULT_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Milliseconds between rendering ticks (16 ≈ 60 Hz).
    pub frame_interval_ms: u64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Milliseconds between snapshot log lines.
    pub interval_ms: u64,
    /// How snapshots are written.
    pub format: ReportFormat,
    /// Log every change notification at debug level.
    pub log_changes: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            format:      ReportFormat::Text,
            log_changes: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}
