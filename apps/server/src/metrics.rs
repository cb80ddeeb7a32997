//! Metrics collection for the patient service
//!
//! Prometheus metrics for HTTP traffic and patient operations.

use crate::Result;
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge_vec, Encoder,
    HistogramVec, IntCounterVec, IntGaugeVec, TextEncoder,
};

lazy_static! {
    // HTTP Request Metrics

    /// Total HTTP requests by method, route, and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "patient_http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .expect("Failed to register HTTP_REQUESTS_TOTAL");

    /// HTTP request duration in seconds
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "patient_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");

    /// In-flight HTTP requests
    pub static ref HTTP_REQUESTS_IN_FLIGHT: IntGaugeVec = register_int_gauge_vec!(
        "patient_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
        &["method", "path"]
    )
    .expect("Failed to register HTTP_REQUESTS_IN_FLIGHT");

    // Patient Operation Metrics

    /// Patient operations by operation and outcome
    pub static ref PATIENT_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "patient_operations_total",
        "Total number of patient record operations",
        &["operation", "outcome"]
    )
    .expect("Failed to register PATIENT_OPERATIONS_TOTAL");

    /// Condition transitions caused by test results
    pub static ref CONDITION_CHANGES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "patient_condition_changes_total",
        "Number of patient condition changes by resulting condition",
        &["condition"]
    )
    .expect("Failed to register CONDITION_CHANGES_TOTAL");
}

/// Count a finished service operation.
pub fn record_operation<T>(operation: &str, result: &Result<T>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.outcome(),
    };
    PATIENT_OPERATIONS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
}

/// Map a method and matched route to the patient operation it performs.
pub fn operation_name(method: &str, route: &str) -> Option<&'static str> {
    let route = route.trim_end_matches('/');
    let operation = match (method, route) {
        ("GET", "/patients") => "list",
        ("POST", "/patients") => "create",
        ("GET", "/patients/:id") => "read",
        ("PUT", "/patients/:id") => "update",
        ("DELETE", "/patients/:id") => "delete",
        ("POST", "/patients/:id/tests") => "add_test",
        ("PUT", "/patients/:id/tests/:test_id") => "update_test",
        _ => return None,
    };
    Some(operation)
}

/// Render every registered metric in the Prometheus text format.
pub fn gather_text() -> anyhow::Result<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&prometheus::gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
