//! Operational endpoints and cross-cutting middleware

use crate::support::{assert_status, create_default_patient, json_body, with_test_app};
use axum::http::{Method, StatusCode};

#[tokio::test]
async fn root_lists_patient_endpoints() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let (status, _headers, body) = app.request(Method::GET, "/", None).await?;

            assert_status(status, StatusCode::OK, "root");
            let info = json_body(&body)?;
            assert_eq!(info["server"], "patient-manager");
            assert_eq!(info["status"], "running");

            let endpoints = info["endpoints"].as_array().cloned().unwrap_or_default();
            assert_eq!(endpoints.len(), 7);
            assert!(endpoints
                .iter()
                .any(|e| e["method"] == "PUT" && e["path"] == "/patients/:id/tests/:test_id"));
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn health_reports_memory_store() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let (status, _headers, body) = app.request(Method::GET, "/health", None).await?;

            assert_status(status, StatusCode::OK, "health");
            let health = json_body(&body)?;
            assert_eq!(health["status"], "ok");
            assert_eq!(health["store"], "memory");
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn metrics_expose_patient_operations() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            create_default_patient(app, "Counted").await?;

            let (status, headers, body) = app.request(Method::GET, "/metrics", None).await?;

            assert_status(status, StatusCode::OK, "metrics");
            let content_type = headers
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            assert!(content_type.starts_with("text/plain"), "{content_type}");

            let text = String::from_utf8_lossy(&body);
            assert!(text.contains("patient_operations_total"), "{text}");
            assert!(text.contains("patient_http_requests_total"), "{text}");
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let (status, headers, _body) = app
                .request_with_extra_headers(
                    Method::GET,
                    "/patients",
                    None,
                    &[("x-request-id", "client-supplied-id")],
                )
                .await?;

            assert_status(status, StatusCode::OK, "list");

            let request_id = headers
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            assert!(
                uuid::Uuid::parse_str(request_id).is_ok(),
                "x-request-id should be a server UUID: {request_id}"
            );
            assert_eq!(
                headers.get("x-correlation-id").and_then(|v| v.to_str().ok()),
                Some("client-supplied-id")
            );
            assert_eq!(
                headers
                    .get("x-content-type-options")
                    .and_then(|v| v.to_str().ok()),
                Some("nosniff")
            );
            assert_eq!(
                headers.get("x-frame-options").and_then(|v| v.to_str().ok()),
                Some("DENY")
            );
            assert!(headers.get("strict-transport-security").is_none());
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn unknown_route_is_not_found() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let (status, _headers, _body) = app.request(Method::GET, "/doctors", None).await?;

            assert_status(status, StatusCode::NOT_FOUND, "unknown route");
            Ok(())
        })
    })
    .await
}
