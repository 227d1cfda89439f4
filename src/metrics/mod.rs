// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics, CACHE_OPERATIONS, COOLDOWNS_INSTALLED, COOLDOWN_WAIT, DISPATCH_ATTEMPTS,
    DISPATCH_EXHAUSTED,
};

/// Helper to record the outcome of one request attempt
pub fn record_attempt(outcome: &str) {
    DISPATCH_ATTEMPTS.with_label_values(&[outcome]).inc();
}

pub fn record_cooldown(attempt: u32) {
    let attempt = attempt.to_string();
    COOLDOWNS_INSTALLED
        .with_label_values(&[attempt.as_str()])
        .inc();
}

pub fn record_exhausted(kind: &str) {
    DISPATCH_EXHAUSTED.with_label_values(&[kind]).inc();
}

pub fn record_cooldown_wait(duration_secs: f64) {
    COOLDOWN_WAIT.observe(duration_secs);
}

/// Helper to record content cache operations
pub fn record_cache_hit(kind: &str) {
    CACHE_OPERATIONS.with_label_values(&["hit", kind]).inc();
}

pub fn record_cache_miss(kind: &str) {
    CACHE_OPERATIONS.with_label_values(&["miss", kind]).inc();
}

pub fn record_cache_bypass(kind: &str) {
    CACHE_OPERATIONS.with_label_values(&["bypass", kind]).inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gathered_metrics_include_recorded_series() {
        record_attempt("success");
        record_cache_hit("text");
        let output = gather_metrics();
        assert!(output.contains("dispatch_attempts_total"));
        assert!(output.contains("content_cache_operations_total"));
    }
}
