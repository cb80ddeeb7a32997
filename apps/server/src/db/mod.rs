//! Database layer - patient document stores

pub mod memory;
pub mod postgres;
pub mod traits;

pub use memory::MemoryPatientStore;
pub use postgres::PostgresPatientStore;
pub use traits::PatientStore;
