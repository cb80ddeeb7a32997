//! Handlers for test results nested under a patient

use crate::{api::extractors::JsonBody, models::Patient, state::AppState, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

/// Envelope for `PUT /patients/:id/tests/:test_id`.
///
/// `oldPatient` holds the document *after* the update; existing clients read
/// that key, so the name stays.
#[derive(Debug, Serialize)]
pub struct TestUpdated {
    #[serde(rename = "oldPatient")]
    pub old_patient: Patient,
    pub message: &'static str,
}

pub async fn add_test(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<Patient>)> {
    tracing::debug!(patient_id = %id, %body, "POST /patients/:id/tests");

    let patient = state.patients.add_test(&id, &body).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

pub async fn update_test(
    State(state): State<AppState>,
    Path((id, test_id)): Path<(String, String)>,
    JsonBody(body): JsonBody,
) -> Result<Json<TestUpdated>> {
    tracing::debug!(
        patient_id = %id,
        test_id = %test_id,
        %body,
        "PUT /patients/:id/tests/:test_id"
    );

    let patient = state.patients.update_test(&id, &test_id, &body).await?;
    Ok(Json(TestUpdated {
        old_patient: patient,
        message: "Test info updated",
    }))
}
