//! PostgreSQL patient store - one JSONB document per patient

use super::traits::PatientStore;
use crate::{
    models::{Patient, PatientFields, PatientUpdate},
    Error, Result,
};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct PostgresPatientStore {
    pool: PgPool,
}

impl PostgresPatientStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the embedded schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Store(format!("migration failed: {e}")))
    }
}

/// Serialize a patient into its stored document (everything but the id).
fn to_document(patient: &Patient) -> Result<JsonValue> {
    let mut document = serde_json::to_value(patient)?;
    if let Some(object) = document.as_object_mut() {
        object.remove("_id");
    }
    Ok(document)
}

fn from_row(row: &PgRow) -> Result<Patient> {
    let id: String = row.try_get("id")?;
    let mut document: JsonValue = row.try_get("document")?;
    match document.as_object_mut() {
        Some(object) => {
            object.insert("_id".to_string(), JsonValue::String(id));
        }
        None => {
            return Err(Error::Store(format!(
                "patient document {id} is not a JSON object"
            )))
        }
    }
    Ok(serde_json::from_value(document)?)
}

#[async_trait]
impl PatientStore for PostgresPatientStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Patient>> {
        let rows = sqlx::query(
            r#"
            SELECT id::text AS id, document
            FROM patients
            ORDER BY seq
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(from_row).collect()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Patient>> {
        // Bound as text: a malformed id surfaces as a database cast error.
        let row = sqlx::query(
            r#"
            SELECT id::text AS id, document
            FROM patients
            WHERE id = $1::uuid
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(from_row).transpose()
    }

    async fn insert(&self, fields: PatientFields) -> Result<Patient> {
        let patient = Patient::new(Uuid::new_v4().to_string(), fields);
        let document = to_document(&patient)?;

        let row = sqlx::query(
            r#"
            INSERT INTO patients (id, document)
            VALUES ($1::uuid, $2)
            RETURNING id::text AS id, document
            "#,
        )
        .bind(&patient.id)
        .bind(&document)
        .fetch_one(&self.pool)
        .await?;

        from_row(&row)
    }

    async fn find_and_delete(&self, id: &str) -> Result<Option<Patient>> {
        let row = sqlx::query(
            r#"
            DELETE FROM patients
            WHERE id = $1::uuid
            RETURNING id::text AS id, document
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(from_row).transpose()
    }

    async fn find_and_update(&self, id: &str, update: PatientUpdate) -> Result<Option<Patient>> {
        let changes = serde_json::to_value(&update)?;

        let row = sqlx::query(
            r#"
            UPDATE patients
            SET document = document || $2, updated_at = NOW()
            WHERE id = $1::uuid
            RETURNING id::text AS id, document
            "#,
        )
        .bind(id)
        .bind(&changes)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(from_row).transpose()
    }

    async fn save(&self, patient: &Patient) -> Result<Patient> {
        let document = to_document(patient)?;

        let row = sqlx::query(
            r#"
            UPDATE patients
            SET document = $2, updated_at = NOW()
            WHERE id = $1::uuid
            RETURNING id::text AS id, document
            "#,
        )
        .bind(&patient.id)
        .bind(&document)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => from_row(&row),
            None => Err(Error::Store(format!(
                "no patient document found for id \"{}\"",
                patient.id
            ))),
        }
    }
}
