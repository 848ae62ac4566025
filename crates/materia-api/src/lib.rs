//! JSON REST API for the material registry.
//!
//! Exposes an axum [`Router`] backed by any
//! [`materia_core::store::MaterialStore`]. Transport concerns (TLS,
//! listener lifecycle, shutdown) are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! axum::serve(listener, materia_api::api_router(store.clone())).await?;
//! ```

pub mod error;
pub mod materials;

use std::sync::Arc;

use axum::{
  Router,
  routing::get,
};
use materia_core::store::MaterialStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: MaterialStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route(
      "/materials/",
      get(materials::list::<S>).post(materials::create::<S>),
    )
    .route(
      "/materials/{cas_number}",
      get(materials::get_one::<S>).delete(materials::delete_one::<S>),
    )
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
