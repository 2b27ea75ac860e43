use axum_prometheus::metrics::{counter, gauge};

pub const INCREMENTS: &str = "counter_increments";
pub const STORE_FAILURES: &str = "counter_store_failures";
pub const VALUE: &str = "counter_value";

/// A stored increment, with the count it produced
pub fn record_increment(count: u64) {
    counter!(INCREMENTS).increment(1);
    record_value(count);
}

/// Last count read from or written to the store
pub fn record_value(count: u64) {
    gauge!(VALUE).set(count as f64);
}

/// A store call that failed and was answered with a fallback value
pub fn record_store_failure(operation: &'static str) {
    counter!(STORE_FAILURES, "operation" => operation).increment(1);
}
