//! Read tests (GET /patients, GET /patients/:id)
//!
//! Tests cover:
//! - Empty listing
//! - Listing in insertion order, query parameters ignored
//! - Round-trip of a created patient
//! - 404 with an empty body for unknown ids
//! - Store error for malformed ids

use crate::support::{
    assert_status, create_default_patient, create_patient, json_body, patient_id, unknown_id,
    with_test_app, PatientBuilder,
};
use axum::http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn list_on_empty_store_returns_empty_array() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let (status, headers, body) = app.request(Method::GET, "/patients", None).await?;

            assert_status(status, StatusCode::OK, "list");
            assert_eq!(
                headers
                    .get("content-type")
                    .and_then(|v| v.to_str().ok()),
                Some("application/json")
            );
            assert_eq!(&body[..], b"[]");
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn list_returns_patients_in_insertion_order() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let first = create_default_patient(app, "First").await?;
            let second = create_default_patient(app, "Second").await?;
            let third = create_default_patient(app, "Third").await?;

            let (status, _headers, body) = app
                .request(Method::GET, "/patients?sort=name&limit=1", None)
                .await?;

            assert_status(status, StatusCode::OK, "list with ignored params");
            let listed = json_body(&body)?;
            let ids = listed
                .as_array()
                .map(|patients| {
                    patients
                        .iter()
                        .filter_map(|p| patient_id(p).ok())
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();
            assert_eq!(ids, vec![first, second, third]);
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn get_returns_created_patient_unchanged() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let created = create_patient(app, &PatientBuilder::new("Round Trip").build()).await?;
            let id = patient_id(&created)?;

            let (status, _headers, body) = app
                .request(Method::GET, &format!("/patients/{id}"), None)
                .await?;

            assert_status(status, StatusCode::OK, "read");
            assert_eq!(json_body(&body)?, created);
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn get_unknown_patient_is_empty_not_found() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let (status, _headers, body) = app
                .request(Method::GET, &format!("/patients/{}", unknown_id()), None)
                .await?;

            assert_status(status, StatusCode::NOT_FOUND, "read unknown");
            assert!(body.is_empty(), "404 body should be empty, got {body:?}");
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn get_with_malformed_id_is_internal_error() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let (status, _headers, body) = app
                .request(Method::GET, "/patients/not-a-uuid", None)
                .await?;

            assert_status(status, StatusCode::INTERNAL_SERVER_ERROR, "malformed id");
            assert_eq!(json_body(&body)?["code"], "InternalServer");
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn get_accepts_trailing_slash() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let id = create_default_patient(app, "Slash").await?;

            let (status, _headers, body) = app
                .request(Method::GET, &format!("/patients/{id}/"), None)
                .await?;

            assert_status(status, StatusCode::OK, "read with trailing slash");
            assert_eq!(json_body(&body)?["_id"], json!(id));
            Ok(())
        })
    })
    .await
}
