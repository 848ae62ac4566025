//! [`PgStore`] — the PostgreSQL implementation of [`MaterialStore`].

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::{
  PgPool,
  postgres::{PgConnectOptions, PgPoolOptions},
  types::Json,
};

use materia_core::{
  material::{Material, MaterialDraft, PropertyMap},
  store::MaterialStore,
};

use crate::{
  Error, Result,
  config::{ACQUIRE_TIMEOUT, DbConfig, MAX_OVERFLOW, POOL_SIZE, RECYCLE_AFTER},
  schema::SCHEMA,
};

/// SQLSTATE for a unique-constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A material store backed by a PostgreSQL connection pool.
///
/// Cloning is cheap — the inner pool is reference-counted.
#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  /// Build a store from connection parameters.
  ///
  /// The pool is created lazily: no connection is established until the
  /// first round trip, so startup retry logic governs first contact with
  /// the database. Connections are pinged before reuse and recycled
  /// hourly to tolerate transient database restarts.
  pub fn connect(config: &DbConfig) -> Self {
    Self::with_options(config.connect_options())
  }

  /// Build a store from a `postgres://` connection URL.
  pub fn connect_url(url: &str) -> Result<Self> {
    let options: PgConnectOptions = url.parse()?;
    Ok(Self::with_options(options))
  }

  fn with_options(options: PgConnectOptions) -> Self {
    let pool = PgPoolOptions::new()
      .min_connections(POOL_SIZE)
      .max_connections(POOL_SIZE + MAX_OVERFLOW)
      .acquire_timeout(ACQUIRE_TIMEOUT)
      .max_lifetime(RECYCLE_AFTER)
      .test_before_acquire(true)
      .connect_lazy_with(options);
    Self { pool }
  }

  /// Run the schema DDL once. Every statement is idempotent.
  pub async fn ensure_schema(&self) -> Result<()> {
    for statement in SCHEMA {
      sqlx::query(statement).execute(&self.pool).await?;
    }
    Ok(())
  }

  /// Run [`ensure_schema`](Self::ensure_schema) until it succeeds, making
  /// at most `max_attempts` attempts with a fixed `delay` between them.
  /// The last error is returned when every attempt fails.
  pub async fn ensure_schema_with_retry(
    &self,
    max_attempts: u32,
    delay: Duration,
  ) -> Result<()> {
    let mut attempt = 1;
    loop {
      match self.ensure_schema().await {
        Ok(()) => return Ok(()),
        Err(e) if attempt >= max_attempts => return Err(e),
        Err(e) => {
          tracing::warn!(
            attempt,
            max_attempts,
            error = %e,
            "database not ready, retrying"
          );
          tokio::time::sleep(delay).await;
          attempt += 1;
        }
      }
    }
  }

  /// Drain the pool. Called once at process shutdown; all idle connections
  /// are closed and checked-out ones are closed on return.
  pub async fn close(&self) {
    self.pool.close().await;
  }
}

// ─── Row mapping ─────────────────────────────────────────────────────────────

#[derive(sqlx::FromRow)]
struct MaterialRow {
  id:          i64,
  cas_number:  String,
  properties:  Json<PropertyMap>,
  create_time: DateTime<Utc>,
  update_time: DateTime<Utc>,
}

impl From<MaterialRow> for Material {
  fn from(row: MaterialRow) -> Self {
    Material {
      id:          row.id,
      cas_number:  row.cas_number,
      properties:  row.properties.0,
      create_time: row.create_time,
      update_time: row.update_time,
    }
  }
}

const MATERIAL_COLUMNS: &str = "id, cas_number, properties, create_time, update_time";

// ─── MaterialStore impl ──────────────────────────────────────────────────────

impl MaterialStore for PgStore {
  type Error = Error;

  async fn create(&self, draft: MaterialDraft) -> Result<Material> {
    // RETURNING hands back the store-assigned id and timestamps in the
    // same round trip as the insert.
    let row = sqlx::query_as::<_, MaterialRow>(&format!(
      "INSERT INTO materials (cas_number, properties)
       VALUES ($1, $2)
       RETURNING {MATERIAL_COLUMNS}"
    ))
    .bind(&draft.cas_number)
    .bind(Json(&draft.properties))
    .fetch_one(&self.pool)
    .await
    .map_err(|e| map_unique_violation(e, &draft.cas_number))?;

    Ok(row.into())
  }

  async fn get_by_cas(&self, cas_number: &str) -> Result<Option<Material>> {
    let row = sqlx::query_as::<_, MaterialRow>(&format!(
      "SELECT {MATERIAL_COLUMNS} FROM materials WHERE cas_number = $1"
    ))
    .bind(cas_number)
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Material::from))
  }

  async fn list_all(&self) -> Result<Vec<Material>> {
    // No ORDER BY: relative order across calls is whatever the store
    // defaults to.
    let rows = sqlx::query_as::<_, MaterialRow>(&format!(
      "SELECT {MATERIAL_COLUMNS} FROM materials"
    ))
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.into_iter().map(Material::from).collect())
  }

  async fn delete_by_cas(&self, cas_number: &str) -> Result<bool> {
    // Two-step check-then-act: a missing key never issues a DELETE.
    if self.get_by_cas(cas_number).await?.is_none() {
      return Ok(false);
    }

    sqlx::query("DELETE FROM materials WHERE cas_number = $1")
      .bind(cas_number)
      .execute(&self.pool)
      .await?;

    Ok(true)
  }
}

/// Map a unique-constraint violation on insert onto the domain conflict
/// error; everything else stays a database error.
fn map_unique_violation(err: sqlx::Error, cas_number: &str) -> Error {
  if let sqlx::Error::Database(db_err) = &err
    && db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
  {
    return Error::Core(materia_core::Error::DuplicateCas(
      cas_number.to_string(),
    ));
  }
  Error::Database(err)
}
