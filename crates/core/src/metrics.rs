use crate::aggregate::WindowAggregate;
use serde::Serialize;
use std::fmt;

/// Every field an observer can be notified about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Fps,
    ProcessCycleTime,
    IdleCycleTime,
    ProcessCyclePercentage,
    IdleCyclePercentage,
    NumberOfSamples,
}

impl Metric {
    /// Stable public name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Fps                    => "FPS",
            Metric::ProcessCycleTime       => "ProcessCycleTime",
            Metric::IdleCycleTime          => "IdleCycleTime",
            Metric::ProcessCyclePercentage => "ProcessCyclePercentage",
            Metric::IdleCyclePercentage    => "IdleCyclePercentage",
            Metric::NumberOfSamples        => "NumberOfSamples",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Float(f64),
    Count(u64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Float(v) => write!(f, "{v:.4}"),
            MetricValue::Count(v) => write!(f, "{v}"),
        }
    }
}

/// A single "field X now has value Y" notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricChange {
    pub metric: Metric,
    pub value:  MetricValue,
}

/// Live metric values. Percentages are derived on read.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Metrics {
    fps:                f64,
    process_cycle_time: u64,
    idle_cycle_time:    u64,
}

impl Metrics {
    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn process_cycle_time(&self) -> u64 {
        self.process_cycle_time
    }

    pub fn idle_cycle_time(&self) -> u64 {
        self.idle_cycle_time
    }

    /// Share of measured cycles spent in this process, in `[0, 1]`.
    ///
    /// Assumes every measured cycle is either ours or idle; other processes'
    /// activity skews the result.
    #[must_use]
    pub fn process_cycle_percentage(&self) -> f64 {
        let total = self.total_cycles();
        if total == 0 {
            return 0.0;
        }
        self.process_cycle_time as f64 / total as f64
    }

    /// Share of measured cycles spent idle, in `[0, 1]`.
    #[must_use]
    pub fn idle_cycle_percentage(&self) -> f64 {
        let total = self.total_cycles();
        if total == 0 {
            return 0.0;
        }
        self.idle_cycle_time as f64 / total as f64
    }

    fn total_cycles(&self) -> u128 {
        u128::from(self.process_cycle_time) + u128::from(self.idle_cycle_time)
    }

    /// Store a fresh aggregate and report which fields changed.
    ///
    /// Comparison is exact. A change to either cycle time also reports both
    /// percentages, whether or not their computed values moved.
    pub fn apply(&mut self, aggregate: &WindowAggregate) -> Vec<MetricChange> {
        let mut changes = Vec::new();

        if aggregate.fps != self.fps {
            self.fps = aggregate.fps;
            changes.push(MetricChange {
                metric: Metric::Fps,
                value:  MetricValue::Float(self.fps),
            });
        }

        if aggregate.process_cycle_time != self.process_cycle_time {
            self.process_cycle_time = aggregate.process_cycle_time;
            changes.push(MetricChange {
                metric: Metric::ProcessCycleTime,
                value:  MetricValue::Count(self.process_cycle_time),
            });
            self.push_percentages(&mut changes);
        }

        if aggregate.idle_cycle_time != self.idle_cycle_time {
            self.idle_cycle_time = aggregate.idle_cycle_time;
            changes.push(MetricChange {
                metric: Metric::IdleCycleTime,
                value:  MetricValue::Count(self.idle_cycle_time),
            });
            self.push_percentages(&mut changes);
        }

        changes
    }

    fn push_percentages(&self, changes: &mut Vec<MetricChange>) {
        changes.push(MetricChange {
            metric: Metric::ProcessCyclePercentage,
            value:  MetricValue::Float(self.process_cycle_percentage()),
        });
        changes.push(MetricChange {
            metric: Metric::IdleCyclePercentage,
            value:  MetricValue::Float(self.idle_cycle_percentage()),
        });
    }
}

/// Point-in-time copy of everything an observer can read, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub fps:                      f64,
    pub process_cycle_time:       u64,
    pub idle_cycle_time:          u64,
    pub process_cycle_percentage: f64,
    pub idle_cycle_percentage:    f64,
    pub number_of_samples:        usize,
    pub number_of_processors:     usize,
}
