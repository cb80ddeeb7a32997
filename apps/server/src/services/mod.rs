//! Service layer - business rules between handlers and the store

pub mod patients;

pub use patients::PatientService;
