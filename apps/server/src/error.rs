//! Error types for the patient service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A required field was absent from the request body.
    #[error("{0}")]
    Validation(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Patient or test lookup miss on endpoints that answer with an empty body.
    #[error("Not found")]
    NotFound,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Cast to {expected} failed for field \"{field}\": {reason}")]
    Cast {
        field: &'static str,
        expected: &'static str,
        reason: String,
    },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Error::NotFound | Error::PatientNotFound => StatusCode::NOT_FOUND,
            Error::Database(_)
            | Error::Cast { .. }
            | Error::Store(_)
            | Error::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short outcome label used for operation metrics.
    pub fn outcome(&self) -> &'static str {
        match self.status_code() {
            StatusCode::BAD_REQUEST => "invalid",
            StatusCode::NOT_FOUND => "not_found",
            _ => "error",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            Error::NotFound => status.into_response(),
            Error::PatientNotFound => (status, Json(json!("Patient not found"))).into_response(),
            Error::Validation(_) | Error::InvalidBody(_) => {
                let body = Json(json!({
                    "code": "BadRequest",
                    "message": self.to_string(),
                }));
                (status, body).into_response()
            }
            Error::Database(_)
            | Error::Cast { .. }
            | Error::Store(_)
            | Error::Serialization(_) => {
                tracing::error!(error = %self, "Store operation failed");
                let body = Json(json!({
                    "code": "InternalServer",
                    "message": self.to_string(),
                }));
                (status, body).into_response()
            }
        }
    }
}
