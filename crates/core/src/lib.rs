//! Windowed frame-rate and CPU-occupancy sampling for a rendering thread.
//!
//! A [`Sampler`] is ticked once per rendered frame. Each tick records a
//! [`Sample`] into a fixed-size [`SampleWindow`]; the window is then scanned
//! to derive frames per second and the split of CPU cycles between this
//! process and the idle threads. Observers are told about every field that
//! changed.

pub mod aggregate;
pub mod error;
pub mod metrics;
pub mod observer;
pub mod sample;
pub mod sampler;
pub mod source;
pub mod window;

pub use aggregate::{aggregate, WindowAggregate};
pub use error::{PerfError, Result};
pub use metrics::{Metric, MetricChange, MetricValue, Metrics, MetricsSnapshot};
pub use observer::SubscriptionId;
pub use sample::Sample;
pub use sampler::{Sampler, TickOutcome};
pub use source::CycleTimeSource;
pub use window::{SampleWindow, DEFAULT_CAPACITY};
