//! Delete tests (DELETE /patients/:id)

use crate::support::{
    assert_status, create_default_patient, create_patient, json_body, patient_id, unknown_id,
    with_test_app, PatientBuilder,
};
use axum::http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn delete_returns_removed_patient() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let created = create_patient(app, &PatientBuilder::new("Gone Soon").build()).await?;
            let id = patient_id(&created)?;

            let (status, _headers, body) = app
                .request(Method::DELETE, &format!("/patients/{id}"), None)
                .await?;

            assert_status(status, StatusCode::OK, "delete");
            assert_eq!(json_body(&body)?, created);

            let (status, _headers, _body) = app
                .request(Method::GET, &format!("/patients/{id}"), None)
                .await?;
            assert_status(status, StatusCode::NOT_FOUND, "read after delete");
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn delete_unknown_patient_leaves_store_unchanged() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let kept = create_default_patient(app, "Kept").await?;

            let (status, _headers, body) = app
                .request(Method::DELETE, &format!("/patients/{}", unknown_id()), None)
                .await?;

            assert_status(status, StatusCode::NOT_FOUND, "delete unknown");
            assert_eq!(json_body(&body)?, json!("Patient not found"));

            let (_status, _headers, body) = app.request(Method::GET, "/patients", None).await?;
            let listed = json_body(&body)?;
            assert_eq!(listed.as_array().map(Vec::len), Some(1));
            assert_eq!(listed[0]["_id"], json!(kept));
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn delete_twice_is_not_found() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let id = create_default_patient(app, "Twice").await?;
            let path = format!("/patients/{id}/");

            let (status, _headers, _body) = app.request(Method::DELETE, &path, None).await?;
            assert_status(status, StatusCode::OK, "first delete");

            let (status, _headers, body) = app.request(Method::DELETE, &path, None).await?;
            assert_status(status, StatusCode::NOT_FOUND, "second delete");
            assert_eq!(json_body(&body)?, json!("Patient not found"));
            Ok(())
        })
    })
    .await
}
