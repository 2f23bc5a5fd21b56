//! Metric names and recording helpers

use std::time::Instant;

use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram, Meter},
};

/// Image operations dispatched, by operation, provider, and outcome
pub const IMAGEGEN_REQUEST_COUNT: &str = "ririsa.imagegen.request.count";
/// Provider call latency in seconds
pub const IMAGEGEN_REQUEST_DURATION: &str = "ririsa.imagegen.request.duration";

/// Meter shared by every Ririsa instrument
pub fn meter() -> Meter {
    global::meter("ririsa")
}

/// Record a duration measurement on a histogram
pub fn record_duration(histogram: &Histogram<f64>, start: Instant, attributes: &[KeyValue]) {
    histogram.record(start.elapsed().as_secs_f64(), attributes);
}

/// Instruments for image dispatch
///
/// Without an exporter the global meter is a no-op, so these are always safe
/// to record on.
#[derive(Clone)]
pub struct ImageGenMetrics {
    count: Counter<u64>,
    duration: Histogram<f64>,
}

impl ImageGenMetrics {
    pub fn new() -> Self {
        let meter = meter();

        Self {
            count: meter
                .u64_counter(IMAGEGEN_REQUEST_COUNT)
                .with_description("Image operations dispatched to a provider")
                .build(),
            duration: meter
                .f64_histogram(IMAGEGEN_REQUEST_DURATION)
                .with_description("Image provider call latency")
                .with_unit("s")
                .build(),
        }
    }

    /// Record one finished provider call
    pub fn record(&self, operation: &'static str, provider: &str, success: bool, start: Instant) {
        let attributes = [
            KeyValue::new("operation", operation),
            KeyValue::new("provider", provider.to_string()),
            KeyValue::new("outcome", if success { "success" } else { "error" }),
        ];

        self.count.add(1, &attributes);
        record_duration(&self.duration, start, &attributes);
    }
}

impl Default for ImageGenMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ImageGenMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageGenMetrics").finish_non_exhaustive()
    }
}
