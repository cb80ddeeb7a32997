//! Startup: connect the patient store once before serving

use crate::{
    config::{DatabaseConfig, StoreBackend},
    db::{MemoryPatientStore, PatientStore, PostgresPatientStore},
};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use url::Url;

pub async fn connect_store(config: &DatabaseConfig) -> anyhow::Result<Arc<dyn PatientStore>> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::info!(backend = "memory", "Using in-memory patient store");
            Ok(Arc::new(MemoryPatientStore::new()))
        }
        StoreBackend::Postgres => {
            let store = connect_postgres(config).await?;
            Ok(Arc::new(store))
        }
    }
}

pub async fn connect_postgres(config: &DatabaseConfig) -> anyhow::Result<PostgresPatientStore> {
    let display_url = redact_url(&config.url);

    let pool = PgPoolOptions::new()
        .min_connections(config.pool_min_size)
        .max_connections(config.pool_max_size)
        .acquire_timeout(Duration::from_secs(config.pool_timeout_seconds))
        .connect(&config.url)
        .await
        .map_err(|e| {
            tracing::error!(database = %display_url, error = %e, "Database connection error");
            e
        })
        .with_context(|| format!("Failed to connect to the database {display_url}"))?;

    let store = PostgresPatientStore::new(pool);
    if config.run_migrations {
        store
            .migrate()
            .await
            .context("Failed to run database migrations")?;
    }

    tracing::info!(database = %display_url, "Connected to the database");
    Ok(store)
}

/// Hide the password in a connection string before it is logged.
pub fn redact_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("***"));
            }
            url.to_string()
        }
        Err(_) => "<invalid database url>".to_string(),
    }
}
