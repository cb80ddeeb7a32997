
use anyhow::Context as _;
use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode},
    Router,
};
use futures::FutureExt as _;
use patient_manager::{
    api::create_router,
    config::StoreBackend,
    db::{MemoryPatientStore, PatientStore},
    startup, AppState, Config,
};
use sqlx::Connection as _;
use std::sync::Arc;
use tower::ServiceExt as _;
use url::Url;
use uuid::Uuid;

// Re-export commonly used items
pub use assertions::*;
pub use builders::*;
pub use fixtures::*;

/// Per-test PostgreSQL schema, dropped on cleanup.
struct PostgresSchema {
    schema: String,
    admin_database_url: String,
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    postgres: Option<PostgresSchema>,
}

impl TestApp {
    /// App backed by a fresh in-memory store.
    pub fn new() -> Self {
        patient_manager::logging::init_simple_logging();

        let mut config = Config::default();
        config.database.backend = StoreBackend::Memory;
        let store: Arc<dyn PatientStore> = Arc::new(MemoryPatientStore::new());
        let state = AppState::with_store(config, store);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            postgres: None,
        }
    }

    /// App backed by PostgreSQL in its own schema, when `TEST_DATABASE_URL` is set.
    pub async fn postgres() -> anyhow::Result<Option<Self>> {
        let Ok(admin_database_url) = std::env::var("TEST_DATABASE_URL") else {
            return Ok(None);
        };
        patient_manager::logging::init_simple_logging();

        let schema = format!("test_{}", Uuid::new_v4().simple());
        let mut admin_conn = sqlx::PgConnection::connect(&admin_database_url)
            .await
            .context("connect admin db for schema create")?;
        sqlx::query(&format!(r#"CREATE SCHEMA "{}""#, schema))
            .execute(&mut admin_conn)
            .await
            .context("create test schema")?;

        let mut config = Config::default();
        config.database.backend = StoreBackend::Postgres;
        config.database.url = with_search_path(&admin_database_url, &schema)?;
        config.database.pool_min_size = 0;
        config.database.pool_max_size = 2;

        let store = startup::connect_store(&config.database)
            .await
            .context("connect test store")?;
        let state = AppState::with_store(config, store);
        let router = create_router(state.clone());

        Ok(Some(Self {
            router,
            state,
            postgres: Some(PostgresSchema {
                schema,
                admin_database_url,
            }),
        }))
    }

    pub async fn cleanup(self) -> anyhow::Result<()> {
        let Some(postgres) = self.postgres else {
            return Ok(());
        };

        let mut admin_conn = sqlx::PgConnection::connect(&postgres.admin_database_url)
            .await
            .context("connect admin db for schema drop")?;
        sqlx::query(&format!(r#"DROP SCHEMA "{}" CASCADE"#, postgres.schema))
            .execute(&mut admin_conn)
            .await
            .context("drop test schema")?;

        Ok(())
    }

    pub async fn request(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<Bytes>,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        self.request_with_extra_headers(method, path_and_query, body, &[])
            .await
    }

    pub async fn request_with_extra_headers(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<Bytes>,
        extra_headers: &[(&str, &str)],
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let mut request = Request::builder()
            .method(method)
            .uri(path_and_query)
            .header("host", "example.org")
            .header("accept", "application/json")
            .header("content-type", "application/json")
            .body(match body {
                Some(bytes) => Body::from(bytes),
                None => Body::empty(),
            })
            .context("build request")?;

        for (name, value) in extra_headers {
            request.headers_mut().insert(
                name.parse::<HeaderName>().context("parse header name")?,
                value.parse::<HeaderValue>().context("parse header value")?,
            );
        }

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .context("dispatch request")?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .context("read response body")?;

        Ok((status, headers, body))
    }
}

/// Run `f` against an app backed by the in-memory store.
pub async fn with_test_app<F>(f: F) -> anyhow::Result<()>
where
    F: for<'a> FnOnce(
        &'a TestApp,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = anyhow::Result<()>> + 'a>,
    >,
{
    run(TestApp::new(), f).await
}

/// Run `f` against PostgreSQL; a no-op when `TEST_DATABASE_URL` is unset.
pub async fn with_postgres_app<F>(f: F) -> anyhow::Result<()>
where
    F: for<'a> FnOnce(
        &'a TestApp,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = anyhow::Result<()>> + 'a>,
    >,
{
    match TestApp::postgres().await? {
        Some(app) => run(app, f).await,
        None => {
            eprintln!("TEST_DATABASE_URL not set, skipping PostgreSQL test");
            Ok(())
        }
    }
}

async fn run<F>(app: TestApp, f: F) -> anyhow::Result<()>
where
    F: for<'a> FnOnce(
        &'a TestApp,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = anyhow::Result<()>> + 'a>,
    >,
{
    let result = std::panic::AssertUnwindSafe(f(&app)).catch_unwind().await;
    let cleanup_result = app.cleanup().await;

    if let Err(e) = cleanup_result {
        eprintln!("test schema cleanup failed: {e:?}");
    }

    match result {
        Ok(r) => r,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

fn with_search_path(database_url: &str, schema: &str) -> anyhow::Result<String> {
    let mut url = Url::parse(database_url).context("parse database URL")?;
    url.query_pairs_mut()
        .append_pair("options", &format!("-c search_path={}", schema));
    Ok(url.to_string())
}
