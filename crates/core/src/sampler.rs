use crate::{
    aggregate::aggregate,
    error::{PerfError, Result},
    metrics::{Metric, MetricChange, MetricValue, Metrics, MetricsSnapshot},
    observer::{Observers, SubscriptionId},
    sample::Sample,
    source::CycleTimeSource,
    window::{SampleWindow, DEFAULT_CAPACITY},
};
use std::time::Duration;
use tracing::{debug, trace};

/// What a call to [`Sampler::on_tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timestamp did not advance past the last recorded tick; nothing happened.
    Stale,
    /// A sample was recorded and `changes` notifications were published.
    Recorded { changes: usize },
}

/// Per-frame performance sampler.
///
/// Call [`on_tick`](Self::on_tick) once per rendering pass with the
/// rendering clock's timestamp. Everything here is single-threaded: the
/// sampler must be owned and driven by the rendering thread.
pub struct Sampler<S> {
    source:               S,
    number_of_processors: usize,
    window:               SampleWindow,
    metrics:              Metrics,
    last_tick:            Option<Duration>,
    observers:            Observers,
}

impl<S: CycleTimeSource> Sampler<S> {
    /// Sampler with the default window of 10 samples.
    pub fn new(number_of_processors: usize, source: S) -> Self {
        Self::with_samples(number_of_processors, DEFAULT_CAPACITY, source)
    }

    pub fn with_samples(number_of_processors: usize, number_of_samples: usize, source: S) -> Self {
        Self {
            source,
            number_of_processors: number_of_processors.max(1),
            window: SampleWindow::new(number_of_samples),
            metrics: Metrics::default(),
            last_tick: None,
            observers: Observers::default(),
        }
    }

    /// Record one rendering tick.
    ///
    /// A timestamp that is not strictly later than the last recorded one is
    /// ignored. A failed cycle-time query is returned to the caller and
    /// leaves all state untouched, so the same timestamp may be retried.
    pub fn on_tick(&mut self, timestamp: Duration) -> Result<TickOutcome> {
        if self.last_tick.is_some_and(|last| timestamp <= last) {
            trace!(?timestamp, "dropping stale tick");
            return Ok(TickOutcome::Stale);
        }

        let process_cycles = self.source.process_cycles()?;
        let idle_per_cpu = self
            .source
            .idle_cycles_per_processor(self.number_of_processors)?;
        if idle_per_cpu.len() != self.number_of_processors {
            return Err(PerfError::CycleTime(format!(
                "expected idle cycles for {} processors, got {}",
                self.number_of_processors,
                idle_per_cpu.len()
            )));
        }
        let idle_cycles = idle_per_cpu
            .iter()
            .fold(0u64, |acc, cycles| acc.saturating_add(*cycles));

        self.last_tick = Some(timestamp);
        self.window
            .push(Sample::new(timestamp, 1, process_cycles, idle_cycles));

        let changes = self.recompute();
        debug!(
            ?timestamp,
            process_cycles,
            idle_cycles,
            changes,
            "recorded sample"
        );
        Ok(TickOutcome::Recorded { changes })
    }

    /// Re-derive metrics from the window and publish what changed.
    fn recompute(&mut self) -> usize {
        let Some(aggregate) = aggregate(&self.window) else {
            return 0;
        };
        let changes = self.metrics.apply(&aggregate);
        for change in &changes {
            self.observers.publish(change);
        }
        changes.len()
    }

    /// Change the window size. Values below 1 are raised to 1.
    ///
    /// An actual change discards all held samples and publishes
    /// `NumberOfSamples`; metric values keep their last computed state
    /// until the refilled window spans a non-zero time.
    pub fn set_number_of_samples(&mut self, number_of_samples: usize) {
        if self.window.resize(number_of_samples) {
            debug!(capacity = self.window.capacity(), "sample window resized");
            self.observers.publish(&MetricChange {
                metric: Metric::NumberOfSamples,
                value:  MetricValue::Count(self.window.capacity() as u64),
            });
        }
    }

    /// Register a callback for metric change notifications.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&MetricChange) + 'static,
    {
        self.observers.subscribe(Box::new(observer))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }
}

impl<S> Sampler<S> {
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn window(&self) -> &SampleWindow {
        &self.window
    }

    pub fn fps(&self) -> f64 {
        self.metrics.fps()
    }

    pub fn process_cycle_time(&self) -> u64 {
        self.metrics.process_cycle_time()
    }

    pub fn idle_cycle_time(&self) -> u64 {
        self.metrics.idle_cycle_time()
    }

    pub fn process_cycle_percentage(&self) -> f64 {
        self.metrics.process_cycle_percentage()
    }

    pub fn idle_cycle_percentage(&self) -> f64 {
        self.metrics.idle_cycle_percentage()
    }

    pub fn number_of_samples(&self) -> usize {
        self.window.capacity()
    }

    pub fn number_of_processors(&self) -> usize {
        self.number_of_processors
    }

    /// Timestamp of the last recorded tick, if any.
    pub fn last_tick(&self) -> Option<Duration> {
        self.last_tick
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            fps:                      self.metrics.fps(),
            process_cycle_time:       self.metrics.process_cycle_time(),
            idle_cycle_time:          self.metrics.idle_cycle_time(),
            process_cycle_percentage: self.metrics.process_cycle_percentage(),
            idle_cycle_percentage:    self.metrics.idle_cycle_percentage(),
            number_of_samples:        self.window.capacity(),
            number_of_processors:     self.number_of_processors,
        }
    }
}

impl<S> std::fmt::Debug for Sampler<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sampler")
            .field("number_of_processors", &self.number_of_processors)
            .field("window", &self.window)
            .field("metrics", &self.metrics)
            .field("last_tick", &self.last_tick)
            .field("observers", &self.observers)
            .finish_non_exhaustive()
    }
}
