//! Request handlers for API endpoints
//!
//! Handlers extract path and body, call the patient service and shape the
//! response envelope; validation and store access live in the service.

pub mod metrics;
pub mod patients;
pub mod system;
pub mod test_results;

pub use metrics::*;
pub use patients::*;
pub use system::*;
pub use test_results::*;
