//! Prometheus metrics for the store worker.
//!
//! All metrics follow the naming convention: `sdk_<component>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Gauge, Histogram, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // BACKGROUND WORKER
    // =========================================================================

    /// Ticks executed by the background poller
    pub static ref WORKER_TICKS: Counter = Counter::new(
        "sdk_worker_ticks_total",
        "Total number of background worker ticks"
    ).expect("metric creation failed");

    /// Status publishes that failed (the loop keeps going)
    pub static ref WORKER_PUBLISH_FAILURES: Counter = Counter::new(
        "sdk_worker_publish_failures_total",
        "Worker status publishes rejected by the store"
    ).expect("metric creation failed");

    /// Last tick number reported by the worker
    pub static ref WORKER_TICK_COUNT: Gauge = Gauge::new(
        "sdk_worker_tick_count",
        "Tick counter of the running worker"
    ).expect("metric creation failed");

    /// Time spent publishing one status
    pub static ref WORKER_PUBLISH_DURATION: Histogram = Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "sdk_worker_publish_duration_seconds",
            "Time spent writing worker status to the store"
        ).buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0])
    ).expect("metric creation failed");

    // =========================================================================
    // STATUS MONITOR
    // =========================================================================

    /// Status updates seen by the monitor
    pub static ref MONITOR_UPDATES: CounterVec = CounterVec::new(
        Opts::new("sdk_monitor_updates_total", "Worker status updates received"),
        &["outcome"]  // recorded / ignored / invalid
    ).expect("metric creation failed");
}

/// Keeps the registry alive for the lifetime of the process.
pub struct MetricsHandle {
    _registry: Registry,
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(WORKER_TICKS.clone()),
        Box::new(WORKER_PUBLISH_FAILURES.clone()),
        Box::new(WORKER_TICK_COUNT.clone()),
        Box::new(WORKER_PUBLISH_DURATION.clone()),
        Box::new(MONITOR_UPDATES.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        _registry: REGISTRY.clone(),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
