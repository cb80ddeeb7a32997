//! Patient CRUD handlers

use crate::{
    api::extractors::{EncodedJsonBody, JsonBody},
    models::Patient,
    state::AppState,
    Result,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::collections::HashMap;

/// Envelope for `PUT /patients/:id`.
#[derive(Debug, Serialize)]
pub struct PatientUpdated {
    pub data: Patient,
    pub message: &'static str,
}

/// `GET /patients` - query parameters are accepted and ignored.
pub async fn list_patients(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Patient>>> {
    tracing::debug!(?params, "GET /patients");

    let patients = state.patients.list_patients().await?;
    Ok(Json(patients))
}

/// `GET /patients/:id` - 404 with an empty body when missing.
pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Patient>> {
    let patient = state.patients.get_patient(&id).await?;
    Ok(Json(patient))
}

pub async fn create_patient(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<Patient>)> {
    let patient = state.patients.create_patient(&body).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

/// `DELETE /patients/:id` - responds with the removed document.
pub async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Patient>> {
    let patient = state.patients.delete_patient(&id).await?;
    Ok(Json(patient))
}

/// `PUT /patients/:id` - accepts a JSON object or a JSON-encoded string of one.
pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    EncodedJsonBody(body): EncodedJsonBody,
) -> Result<Json<PatientUpdated>> {
    let patient = state.patients.update_patient(&id, &body).await?;
    Ok(Json(PatientUpdated {
        data: patient,
        message: "Patient info updated",
    }))
}
