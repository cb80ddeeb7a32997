//! Route tables

pub mod metrics;
pub mod patients;

/// Patient endpoints as (name, method, path), for the startup log and `GET /`.
pub const ENDPOINTS: [(&str, &str, &str); 7] = [
    ("GET PATIENTS", "GET", "/patients"),
    ("GET SINGLE PATIENT", "GET", "/patients/:id"),
    ("DELETE A PATIENT", "DELETE", "/patients/:id"),
    ("ADD NEW PATIENT", "POST", "/patients"),
    ("UPDATE PATIENT", "PUT", "/patients/:id"),
    ("ADD TEST", "POST", "/patients/:id/tests"),
    ("UPDATE TEST", "PUT", "/patients/:id/tests/:test_id"),
];
