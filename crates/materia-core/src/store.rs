//! The `MaterialStore` trait — the contract every storage backend implements.
//!
//! Higher layers (`materia-api`, `materia-server`) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use crate::material::{Material, MaterialDraft};

/// Abstraction over a material store backend.
///
/// `create` does not pre-check uniqueness; callers that want a clean
/// conflict response look the key up first, and the backend's unique
/// constraint is the backstop for racing inserts.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait MaterialStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert a new material and return the persisted record with its
  /// store-assigned `id` and timestamps. A duplicate CAS number surfaces
  /// as the backend's constraint violation.
  fn create(
    &self,
    draft: MaterialDraft,
  ) -> impl Future<Output = Result<Material, Self::Error>> + Send + '_;

  /// Retrieve a material by exact CAS number. Returns `None` if not found.
  fn get_by_cas<'a>(
    &'a self,
    cas_number: &'a str,
  ) -> impl Future<Output = Result<Option<Material>, Self::Error>> + Send + 'a;

  /// List every material in store order. No ordering is guaranteed beyond
  /// whatever the backend defaults to.
  fn list_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Material>, Self::Error>> + Send + '_;

  /// Delete a material by CAS number. Looks the row up first; returns
  /// `false` without touching the store when the key is absent.
  fn delete_by_cas<'a>(
    &'a self,
    cas_number: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}
