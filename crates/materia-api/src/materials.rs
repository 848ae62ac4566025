//! Handlers for `/materials/` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST`   | `/materials/` | 409 if the CAS number already exists |
//! | `GET`    | `/materials/` | Array of every record |
//! | `GET`    | `/materials/:cas_number` | 404 if not found |
//! | `DELETE` | `/materials/:cas_number` | 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use materia_core::{
  material::{Material, MaterialDraft},
  store::MaterialStore,
};
use serde_json::json;

use crate::error::ApiError;

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /materials/` — body: `{"cas_number": "...", "properties": {...}}`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  payload: Result<Json<MaterialDraft>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MaterialStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Json(draft) = payload?;
  draft
    .validate()
    .map_err(|e| ApiError::Validation(e.to_string()))?;

  // Pre-check so duplicates surface as a clean 409 before any write is
  // attempted; the store's unique constraint remains the backstop for
  // racing creates. Check-then-insert, not insert-then-catch.
  let existing = store
    .get_by_cas(&draft.cas_number)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if existing.is_some() {
    return Err(ApiError::Conflict(format!(
      "CAS number {} already exists",
      draft.cas_number
    )));
  }

  let material = store
    .create(draft)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(material)))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /materials/`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Material>>, ApiError>
where
  S: MaterialStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let materials = store
    .list_all()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(materials))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /materials/:cas_number`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(cas_number): Path<String>,
) -> Result<Json<Material>, ApiError>
where
  S: MaterialStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let material = store
    .get_by_cas(&cas_number)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound("material record not found".to_string()))?;
  Ok(Json(material))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /materials/:cas_number`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(cas_number): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: MaterialStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let deleted = store
    .delete_by_cas(&cas_number)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if !deleted {
    return Err(ApiError::NotFound(
      "material record not found".to_string(),
    ));
  }
  Ok(Json(json!({
    "message": format!("material {cas_number} deleted")
  })))
}
