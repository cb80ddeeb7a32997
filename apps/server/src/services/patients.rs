//! Patient service
//!
//! Validation, condition derivation and the find/mutate/save sequence for
//! nested tests. Handlers stay thin and only shape responses.

use crate::{
    db::PatientStore,
    metrics,
    models::{
        require_fields, Condition, Patient, PatientFields, PatientUpdate, TestFields,
        CREATE_PATIENT_FIELDS, UPDATE_PATIENT_FIELDS,
    },
    Error, Result,
};
use serde_json::Value as JsonValue;
use std::sync::Arc;

#[derive(Clone)]
pub struct PatientService {
    store: Arc<dyn PatientStore>,
}

impl PatientService {
    pub fn new(store: Arc<dyn PatientStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn PatientStore> {
        &self.store
    }

    pub async fn list_patients(&self) -> Result<Vec<Patient>> {
        let result = self.store.find_all().await;
        metrics::record_operation("list", &result);
        result
    }

    /// # Errors
    /// `Error::NotFound` (empty 404) when no patient has `id`.
    pub async fn get_patient(&self, id: &str) -> Result<Patient> {
        let result = self
            .store
            .find_by_id(id)
            .await
            .and_then(|p| p.ok_or(Error::NotFound));
        metrics::record_operation("read", &result);
        result
    }

    pub async fn create_patient(&self, body: &JsonValue) -> Result<Patient> {
        let result = self.try_create_patient(body).await;
        metrics::record_operation("create", &result);
        result
    }

    async fn try_create_patient(&self, body: &JsonValue) -> Result<Patient> {
        require_fields(body, &CREATE_PATIENT_FIELDS)?;
        let fields = PatientFields::from_body(body)?;

        let patient = self.store.insert(fields).await?;
        tracing::info!(patient_id = %patient.id, "Patient created");
        Ok(patient)
    }

    /// # Errors
    /// `Error::PatientNotFound` when no patient has `id`.
    pub async fn delete_patient(&self, id: &str) -> Result<Patient> {
        let result = self
            .store
            .find_and_delete(id)
            .await
            .and_then(|p| p.ok_or(Error::PatientNotFound));
        if let Ok(patient) = &result {
            tracing::info!(patient_id = %patient.id, "Patient deleted");
        }
        metrics::record_operation("delete", &result);
        result
    }

    /// Replace the scalar fields; `condition` is taken verbatim from the body.
    pub async fn update_patient(&self, id: &str, body: &JsonValue) -> Result<Patient> {
        let result = self.try_update_patient(id, body).await;
        metrics::record_operation("update", &result);
        result
    }

    async fn try_update_patient(&self, id: &str, body: &JsonValue) -> Result<Patient> {
        require_fields(body, &UPDATE_PATIENT_FIELDS)?;
        let update = PatientUpdate::from_body(body)?;

        self.store
            .find_and_update(id, update)
            .await?
            .ok_or(Error::PatientNotFound)
    }

    /// Prepend a new test and re-derive the condition (critical above 5).
    pub async fn add_test(&self, id: &str, body: &JsonValue) -> Result<Patient> {
        let result = self.try_add_test(id, body).await;
        metrics::record_operation("add_test", &result);
        result
    }

    async fn try_add_test(&self, id: &str, body: &JsonValue) -> Result<Patient> {
        let fields = TestFields::from_body(body)?;

        let mut patient = self.store.find_by_id(id).await?.ok_or(Error::NotFound)?;
        let previous = patient.condition.clone();

        let test_id = patient.add_test(fields).id.clone();
        log_condition_change(&patient, &previous, &test_id);

        self.store.save(&patient).await
    }

    /// Update a test in place and re-derive the condition (critical above 6).
    pub async fn update_test(&self, id: &str, test_id: &str, body: &JsonValue) -> Result<Patient> {
        let result = self.try_update_test(id, test_id, body).await;
        metrics::record_operation("update_test", &result);
        result
    }

    async fn try_update_test(&self, id: &str, test_id: &str, body: &JsonValue) -> Result<Patient> {
        let fields = TestFields::from_body(body)?;

        let mut patient = self.store.find_by_id(id).await?.ok_or(Error::NotFound)?;
        let previous = patient.condition.clone();

        if patient.update_test(test_id, fields).is_none() {
            tracing::debug!(patient_id = %id, test_id = %test_id, "Test not found");
            return Err(Error::NotFound);
        }
        log_condition_change(&patient, &previous, test_id);

        self.store.save(&patient).await
    }
}

fn log_condition_change(patient: &Patient, previous: &Option<Condition>, test_id: &str) {
    if patient.condition == *previous {
        return;
    }
    let label = |c: &Option<Condition>| c.as_ref().map_or("null", Condition::as_str).to_string();
    let to = label(&patient.condition);
    metrics::CONDITION_CHANGES_TOTAL
        .with_label_values(&[to.as_str()])
        .inc();
    tracing::info!(
        patient_id = %patient.id,
        test_id = %test_id,
        from = %label(previous),
        to = %to,
        "Patient condition changed"
    );
}
