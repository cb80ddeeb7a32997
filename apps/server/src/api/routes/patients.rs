//! Patient API routes
//!
//! Both forms of every path (with and without trailing slash) are registered
//! directly; there are no redirects.

use crate::api::handlers::{patients, test_results};
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn patient_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/patients",
            get(patients::list_patients).post(patients::create_patient),
        )
        .route(
            "/patients/",
            get(patients::list_patients).post(patients::create_patient),
        )
        .route(
            "/patients/:id",
            get(patients::get_patient)
                .put(patients::update_patient)
                .delete(patients::delete_patient),
        )
        .route(
            "/patients/:id/",
            get(patients::get_patient)
                .put(patients::update_patient)
                .delete(patients::delete_patient),
        )
        .route("/patients/:id/tests", post(test_results::add_test))
        .route("/patients/:id/tests/", post(test_results::add_test))
        .route(
            "/patients/:id/tests/:test_id",
            put(test_results::update_test),
        )
        .route(
            "/patients/:id/tests/:test_id/",
            put(test_results::update_test),
        )
}
