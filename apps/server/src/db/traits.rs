//! Core trait for patient document storage backends

use crate::{
    models::{Patient, PatientFields, PatientUpdate},
    Result,
};
use async_trait::async_trait;

/// Document storage for patients and their embedded tests.
///
/// Each method is a single store round-trip. Nested test changes are done by
/// the caller as find, mutate in memory, then [`PatientStore::save`]; there is
/// no optimistic concurrency check, so concurrent writers race and the last
/// save wins.
#[async_trait]
pub trait PatientStore: Send + Sync {
    /// Short backend name for health and startup logging.
    fn backend(&self) -> &'static str;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<()>;

    /// All patients in insertion order.
    async fn find_all(&self) -> Result<Vec<Patient>>;

    /// # Errors
    /// A malformed id is a store error, not a miss.
    async fn find_by_id(&self, id: &str) -> Result<Option<Patient>>;

    /// Insert a new document with a store-assigned id, normal condition and no tests.
    async fn insert(&self, fields: PatientFields) -> Result<Patient>;

    /// Hard delete, returning the removed document.
    async fn find_and_delete(&self, id: &str) -> Result<Option<Patient>>;

    /// Replace the scalar fields and return the updated document.
    async fn find_and_update(&self, id: &str, update: PatientUpdate) -> Result<Option<Patient>>;

    /// Overwrite the whole stored document with `patient`.
    ///
    /// # Errors
    /// `Error::Store` when the document no longer exists.
    async fn save(&self, patient: &Patient) -> Result<Patient>;
}
