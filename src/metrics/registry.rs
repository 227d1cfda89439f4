// Prometheus metrics registry and collectors
// Author: kelexine (https://github.com/kelexine)

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec_with_registry, register_histogram_with_registry, CounterVec, Encoder,
    Histogram, Opts, Registry, TextEncoder,
};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // DISPATCH METRICS
    // ============================================================================

    /// Request attempts by outcome (success, transport, throttled)
    pub static ref DISPATCH_ATTEMPTS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("dispatch_attempts_total", "Outbound request attempts by outcome"),
        &["outcome"],
        REGISTRY
    ).unwrap();

    /// Cooldowns installed on an API handle
    pub static ref COOLDOWNS_INSTALLED: CounterVec = register_counter_vec_with_registry!(
        Opts::new("cooldowns_installed_total", "Cooldown windows installed after a failed attempt"),
        &["attempt"],
        REGISTRY
    ).unwrap();

    /// Requests that exhausted every attempt
    pub static ref DISPATCH_EXHAUSTED: CounterVec = register_counter_vec_with_registry!(
        Opts::new("dispatch_exhausted_total", "Requests that failed after the last attempt"),
        &["kind"],
        REGISTRY
    ).unwrap();

    /// Time spent waiting on a cooldown gate
    pub static ref COOLDOWN_WAIT: Histogram = register_histogram_with_registry!(
        prometheus::HistogramOpts::new("cooldown_wait_seconds", "Time spent waiting for a cooldown to end")
            .buckets(vec![0.1, 0.5, 1.0, 4.0, 9.0, 16.0, 25.0, 60.0]),
        REGISTRY
    ).unwrap();

    // ============================================================================
    // CACHE METRICS
    // ============================================================================

    /// Read-through cache operations
    pub static ref CACHE_OPERATIONS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("content_cache_operations_total", "Content cache operations"),
        &["operation", "kind"], // operation: hit, miss, bypass
        REGISTRY
    ).unwrap();
}

/// Gather all metrics in Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }

    String::from_utf8(buffer).unwrap_or_default()
}
