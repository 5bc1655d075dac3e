use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use uiperf_core::{
    CycleTimeSource, Metric, MetricChange, MetricValue, PerfError, Result, Sampler, TickOutcome,
};

/// Replays scripted `(process, idle)` readings; idle is reported for a single CPU.
#[derive(Default)]
struct Scripted {
    readings: VecDeque<(u64, u64)>,
    pending_idle: Option<u64>,
    fail: Rc<Cell<bool>>,
}

impl Scripted {
    fn new(readings: &[(u64, u64)]) -> Self {
        Self {
            readings: readings.iter().copied().collect(),
            ..Self::default()
        }
    }
}

impl CycleTimeSource for Scripted {
    fn process_cycles(&mut self) -> Result<u64> {
        if self.fail.get() {
            return Err(PerfError::CycleTime("source unavailable".into()));
        }
        let (process, idle) = self
            .readings
            .pop_front()
            .ok_or_else(|| PerfError::CycleTime("script exhausted".into()))?;
        self.pending_idle = Some(idle);
        Ok(process)
    }

    fn idle_cycles_per_processor(&mut self, count: usize) -> Result<Vec<u64>> {
        assert_eq!(count, 1);
        let idle = self
            .pending_idle
            .take()
            .ok_or_else(|| PerfError::CycleTime("idle read before process read".into()))?;
        Ok(vec![idle])
    }
}

/// Source with steadily growing counters, for long runs.
struct Linear {
    step: u64,
    process: u64,
    idle: u64,
}

impl CycleTimeSource for Linear {
    fn process_cycles(&mut self) -> Result<u64> {
        self.process += self.step;
        Ok(self.process)
    }

    fn idle_cycles_per_processor(&mut self, count: usize) -> Result<Vec<u64>> {
        self.idle += self.step * 3;
        Ok(vec![self.idle; count])
    }
}

fn record<S: CycleTimeSource>(sampler: &mut Sampler<S>) -> Rc<RefCell<Vec<MetricChange>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    sampler.subscribe(move |change| sink.borrow_mut().push(*change));
    log
}

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

#[test]
fn two_tick_scenario() {
    let mut sampler = Sampler::with_samples(1, 2, Scripted::new(&[(100, 900), (150, 1850)]));
    let log = record(&mut sampler);

    assert_eq!(
        sampler.on_tick(secs(0)).unwrap(),
        TickOutcome::Recorded { changes: 0 }
    );
    assert!(log.borrow().is_empty());

    assert_eq!(
        sampler.on_tick(secs(1)).unwrap(),
        TickOutcome::Recorded { changes: 7 }
    );
    assert_eq!(sampler.fps(), 2.0);
    assert_eq!(sampler.process_cycle_time(), 50);
    assert_eq!(sampler.idle_cycle_time(), 950);
    assert!((sampler.process_cycle_percentage() - 0.05).abs() < 1e-12);
    assert!((sampler.idle_cycle_percentage() - 0.95).abs() < 1e-12);

    let log = log.borrow();
    assert_eq!(
        log[0],
        MetricChange {
            metric: Metric::Fps,
            value: MetricValue::Float(2.0),
        }
    );
    assert_eq!(
        log[1],
        MetricChange {
            metric: Metric::ProcessCycleTime,
            value: MetricValue::Count(50),
        }
    );
    assert_eq!(log[4].metric, Metric::IdleCycleTime);
}

#[test]
fn duplicate_timestamp_is_dropped() {
    let mut sampler = Sampler::with_samples(
        1,
        2,
        Scripted::new(&[(100, 900), (150, 1850), (999, 9999)]),
    );
    sampler.on_tick(secs(0)).unwrap();
    sampler.on_tick(secs(1)).unwrap();
    let before = sampler.snapshot();
    let log = record(&mut sampler);

    assert_eq!(sampler.on_tick(secs(1)).unwrap(), TickOutcome::Stale);
    assert_eq!(sampler.snapshot(), before);
    assert!(log.borrow().is_empty());
    assert_eq!(sampler.window().len(), 2);
}

#[test]
fn out_of_order_timestamp_is_dropped() {
    let mut sampler = Sampler::with_samples(1, 3, Scripted::new(&[(0, 0), (10, 10)]));
    sampler.on_tick(secs(5)).unwrap();

    assert_eq!(sampler.on_tick(secs(4)).unwrap(), TickOutcome::Stale);
    assert_eq!(sampler.last_tick(), Some(secs(5)));
    assert_eq!(sampler.window().len(), 1);
}

#[test]
fn window_fills_after_capacity_ticks_and_never_overflows() {
    for capacity in 1..=12 {
        let source = Linear { step: 7, process: 0, idle: 0 };
        let mut sampler = Sampler::with_samples(2, capacity, source);

        for tick in 1..=capacity as u64 {
            sampler.on_tick(Duration::from_millis(tick * 16)).unwrap();
            assert!(sampler.window().len() <= capacity);
        }
        assert!(sampler.window().is_full());

        for tick in 0..capacity as u64 * 2 {
            sampler
                .on_tick(Duration::from_millis(1_000 + tick * 16))
                .unwrap();
            assert_eq!(sampler.window().len(), capacity);
        }
    }
}

#[test]
fn cycle_deltas_never_exceed_true_span_and_fps_is_non_negative() {
    let mut sampler = Sampler::with_samples(4, 5, Linear { step: 11, process: 0, idle: 0 });

    for tick in 1..=40u64 {
        sampler.on_tick(Duration::from_millis(tick * 16)).unwrap();
        assert!(sampler.fps() >= 0.0);

        let window = sampler.window();
        let earliest = window.iter().map(|s| s.timestamp()).min().unwrap();
        let latest = window.iter().map(|s| s.timestamp()).max().unwrap();
        if earliest == latest {
            continue;
        }
        let span_ticks = (latest - earliest).as_millis() as u64 / 16;
        let true_cycles = span_ticks * (11 + 4 * 33);
        assert!(sampler.process_cycle_time() + sampler.idle_cycle_time() <= true_cycles);
    }
}

#[test]
fn resize_clears_history_and_holds_metrics_until_two_samples() {
    let mut sampler = Sampler::new(1, Linear { step: 5, process: 0, idle: 0 });
    for tick in 1..=10u64 {
        sampler.on_tick(secs(tick)).unwrap();
    }
    let before = sampler.snapshot();
    let log = record(&mut sampler);

    sampler.set_number_of_samples(3);
    assert_eq!(sampler.number_of_samples(), 3);
    assert!(sampler.window().is_empty());
    assert_eq!(
        *log.borrow(),
        vec![MetricChange {
            metric: Metric::NumberOfSamples,
            value: MetricValue::Count(3),
        }]
    );

    assert_eq!(
        sampler.on_tick(secs(11)).unwrap(),
        TickOutcome::Recorded { changes: 0 }
    );
    assert_eq!(sampler.fps(), before.fps);
    assert_eq!(sampler.process_cycle_time(), before.process_cycle_time);

    sampler.on_tick(secs(12)).unwrap();
    assert_eq!(sampler.fps(), 2.0);
}

#[test]
fn setting_same_sample_count_is_silent() {
    let mut sampler = Sampler::with_samples(1, 4, Linear { step: 1, process: 0, idle: 0 });
    sampler.on_tick(secs(1)).unwrap();
    let log = record(&mut sampler);

    sampler.set_number_of_samples(4);
    assert!(log.borrow().is_empty());
    assert_eq!(sampler.window().len(), 1);

    sampler.set_number_of_samples(0);
    assert_eq!(sampler.number_of_samples(), 1);
}

#[test]
fn percentages_sum_to_one_while_cycles_accumulate() {
    let mut sampler = Sampler::with_samples(3, 4, Linear { step: 13, process: 0, idle: 0 });
    for tick in 1..=20u64 {
        sampler.on_tick(Duration::from_millis(tick * 10)).unwrap();
        let total = sampler.process_cycle_time() + sampler.idle_cycle_time();
        let sum = sampler.process_cycle_percentage() + sampler.idle_cycle_percentage();
        if total > 0 {
            assert!((sum - 1.0).abs() < 1e-9);
        } else {
            assert_eq!(sum, 0.0);
        }
    }
}

#[test]
fn failed_query_leaves_state_and_same_timestamp_can_be_retried() {
    let fail = Rc::new(Cell::new(false));
    let mut source = Scripted::new(&[(100, 900), (150, 1850), (300, 2800)]);
    source.fail = Rc::clone(&fail);
    let mut sampler = Sampler::with_samples(1, 3, source);
    sampler.on_tick(secs(0)).unwrap();
    sampler.on_tick(secs(1)).unwrap();
    let before = sampler.snapshot();
    let log = record(&mut sampler);

    fail.set(true);
    assert!(matches!(
        sampler.on_tick(secs(2)),
        Err(PerfError::CycleTime(_))
    ));
    assert_eq!(sampler.snapshot(), before);
    assert_eq!(sampler.window().len(), 2);
    assert_eq!(sampler.last_tick(), Some(secs(1)));
    assert!(log.borrow().is_empty());

    fail.set(false);
    assert_eq!(
        sampler.on_tick(secs(2)).unwrap(),
        TickOutcome::Recorded { changes: 7 }
    );
    assert_eq!(sampler.window().len(), 3);
    assert_eq!(sampler.last_tick(), Some(secs(2)));
    assert_eq!(sampler.fps(), 1.5);
    assert_eq!(sampler.process_cycle_time(), 200);
    assert_eq!(sampler.idle_cycle_time(), 1900);
}

#[test]
fn unsubscribed_observer_stops_receiving() {
    let mut sampler = Sampler::with_samples(1, 2, Linear { step: 2, process: 0, idle: 0 });
    let log = Rc::new(RefCell::new(0usize));
    let sink = Rc::clone(&log);
    let id = sampler.subscribe(move |_| *sink.borrow_mut() += 1);

    sampler.on_tick(secs(1)).unwrap();
    sampler.on_tick(secs(2)).unwrap();
    let seen = *log.borrow();
    assert!(seen > 0);

    assert!(sampler.unsubscribe(id));
    sampler.on_tick(secs(4)).unwrap();
    assert_eq!(*log.borrow(), seen);
}
