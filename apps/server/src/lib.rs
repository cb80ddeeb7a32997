//! Patient Manager
//!
//! HTTP service for clinic patient records:
//! - CRUD on patient documents
//! - Diagnostic test results embedded in each patient, newest first
//! - Patient condition derived from the latest test reading
//! - PostgreSQL (JSONB) or in-memory document storage

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod startup;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
