//! In-memory patient store, used for local runs and tests

use super::traits::PatientStore;
use crate::{
    models::{Patient, PatientFields, PatientUpdate},
    Error, Result,
};
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryPatientStore {
    patients: RwLock<Vec<Patient>>,
}

impl MemoryPatientStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.patients.read().await.len()
    }
}

/// Ids must look like the ones the store hands out.
fn check_id(id: &str) -> Result<()> {
    Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|e| Error::Store(format!("invalid patient id \"{id}\": {e}")))
}

#[async_trait]
impl PatientStore for MemoryPatientStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Patient>> {
        Ok(self.patients.read().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Patient>> {
        check_id(id)?;
        let patients = self.patients.read().await;
        Ok(patients.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, fields: PatientFields) -> Result<Patient> {
        let patient = Patient::new(Uuid::new_v4().to_string(), fields);
        self.patients.write().await.push(patient.clone());
        Ok(patient)
    }

    async fn find_and_delete(&self, id: &str) -> Result<Option<Patient>> {
        check_id(id)?;
        let mut patients = self.patients.write().await;
        let removed = patients
            .iter()
            .position(|p| p.id == id)
            .map(|index| patients.remove(index));
        Ok(removed)
    }

    async fn find_and_update(&self, id: &str, update: PatientUpdate) -> Result<Option<Patient>> {
        check_id(id)?;
        let mut patients = self.patients.write().await;
        let Some(patient) = patients.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        patient.apply_update(update);
        Ok(Some(patient.clone()))
    }

    async fn save(&self, patient: &Patient) -> Result<Patient> {
        let mut patients = self.patients.write().await;
        let stored = patients
            .iter_mut()
            .find(|p| p.id == patient.id)
            .ok_or_else(|| {
                Error::Store(format!("no patient document found for id \"{}\"", patient.id))
            })?;
        *stored = patient.clone();
        Ok(patient.clone())
    }
}
