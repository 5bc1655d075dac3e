//! uiperf: frame-rate and CPU-occupancy sampler for a rendering loop.
//!
//! Drives a [`Sampler`] from a simulated rendering clock and logs the
//! derived metrics.
//!
//! Run with:  `RUST_LOG=info uiperf [path/to/uiperf.toml]`

use anyhow::Result;
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tokio::time::{self, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use uiperf_config::{ConfigWatcher, ReportFormat};
use uiperf_core::{MetricsSnapshot, Sampler};
use uiperf_system::ProcCycleSource;

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("uiperf v{} starting", env!("CARGO_PKG_VERSION"));

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(uiperf_config::default_path);
    let mut config = uiperf_config::load(&path)?;

    let processors = uiperf_system::processor_count();
    let mut sampler = Sampler::with_samples(
        processors,
        config.sampler.number_of_samples,
        ProcCycleSource::new(),
    );
    info!(
        processors,
        samples = sampler.number_of_samples(),
        "sampler ready"
    );

    let log_changes = Rc::new(Cell::new(config.report.log_changes));
    {
        let log_changes = Rc::clone(&log_changes);
        sampler.subscribe(move |change| {
            if log_changes.get() {
                debug!(metric = %change.metric, value = %change.value, "metric changed");
            }
        });
    }

    let (watcher, mut reload_rx) = ConfigWatcher::spawn(&path);
    let start = Instant::now();
    let mut frames = ticker(config.clock.frame_interval_ms);
    let mut reports = ticker(config.report.interval_ms);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = frames.tick() => {
                // A failed reading costs one frame; the loop keeps going.
                if let Err(e) = sampler.on_tick(start.elapsed()) {
                    warn!("skipping frame: {e}");
                }
            }
            _ = reports.tick() => report(&sampler.snapshot(), config.report.format),
            Some(()) = reload_rx.recv() => {
                let fresh = match uiperf_config::load(&path) {
                    Ok(fresh) => fresh,
                    Err(e) => {
                        warn!("keeping current config: {e}");
                        continue;
                    }
                };
                info!("config reloaded from '{}'", watcher.path().display());

                sampler.set_number_of_samples(fresh.sampler.number_of_samples);
                log_changes.set(fresh.report.log_changes);
                if fresh.clock.frame_interval_ms != config.clock.frame_interval_ms {
                    frames = ticker(fresh.clock.frame_interval_ms);
                }
                if fresh.report.interval_ms != config.report.interval_ms {
                    reports = ticker(fresh.report.interval_ms);
                }
                config = fresh;
            }
            _ = &mut shutdown => {
                info!("shutting down");
                break;
            }
        }
    }

    report(&sampler.snapshot(), config.report.format);
    Ok(())
}

fn ticker(period_ms: u64) -> Interval {
    let mut interval = time::interval(Duration::from_millis(period_ms.max(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

fn report(snapshot: &MetricsSnapshot, format: ReportFormat) {
    match format {
        ReportFormat::Text => info!(
            "{:.1} fps | process {:.1}% | idle {:.1}% | {} samples, {} cpus",
            snapshot.fps,
            snapshot.process_cycle_percentage * 100.0,
            snapshot.idle_cycle_percentage * 100.0,
            snapshot.number_of_samples,
            snapshot.number_of_processors,
        ),
        ReportFormat::Json => match serde_json::to_string(snapshot) {
            Ok(line) => info!("{line}"),
            Err(e) => warn!("cannot serialise snapshot: {e}"),
        },
    }
}
