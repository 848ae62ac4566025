//! [`MemoryStore`] — an in-memory implementation of [`MaterialStore`].
//!
//! Kept in behavioural parity with the Postgres backend (same duplicate and
//! not-found semantics, store-assigned ids, equal timestamps at insert).
//! Used by the API tests and as an executable reference of the contract.

use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::{
  Error, Result,
  material::{Material, MaterialDraft},
  store::MaterialStore,
};

/// Cloning is cheap — all clones share the same row set.
#[derive(Clone, Default)]
pub struct MemoryStore {
  inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
  next_id: i64,
  rows:    Vec<Material>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl MaterialStore for MemoryStore {
  type Error = Error;

  async fn create(&self, draft: MaterialDraft) -> Result<Material> {
    let mut inner = self.inner.lock().expect("memory store lock");

    if inner.rows.iter().any(|m| m.cas_number == draft.cas_number) {
      return Err(Error::DuplicateCas(draft.cas_number));
    }

    inner.next_id += 1;
    let now = Utc::now();
    let material = Material {
      id:          inner.next_id,
      cas_number:  draft.cas_number,
      properties:  draft.properties,
      create_time: now,
      update_time: now,
    };
    inner.rows.push(material.clone());
    Ok(material)
  }

  async fn get_by_cas(&self, cas_number: &str) -> Result<Option<Material>> {
    let inner = self.inner.lock().expect("memory store lock");
    Ok(inner.rows.iter().find(|m| m.cas_number == cas_number).cloned())
  }

  async fn list_all(&self) -> Result<Vec<Material>> {
    let inner = self.inner.lock().expect("memory store lock");
    Ok(inner.rows.clone())
  }

  async fn delete_by_cas(&self, cas_number: &str) -> Result<bool> {
    let mut inner = self.inner.lock().expect("memory store lock");
    let before = inner.rows.len();
    inner.rows.retain(|m| m.cas_number != cas_number);
    Ok(inner.rows.len() < before)
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use crate::material::PropertyMap;

  fn draft(cas: &str) -> MaterialDraft {
    let mut properties = PropertyMap::new();
    properties.insert("density".into(), serde_json::json!("2.7 g/cm³"));
    MaterialDraft { cas_number: cas.to_string(), properties }
  }

  #[tokio::test]
  async fn create_assigns_id_and_timestamps() {
    let s = MemoryStore::new();

    let a = s.create(draft("7429-90-5")).await.unwrap();
    let b = s.create(draft("50-00-0")).await.unwrap();

    assert_eq!(a.id, 1);
    assert_eq!(b.id, 2);
    assert_eq!(a.create_time, a.update_time);
    assert!(b.update_time >= b.create_time);
  }

  #[tokio::test]
  async fn create_rejects_duplicate_cas() {
    let s = MemoryStore::new();
    s.create(draft("7429-90-5")).await.unwrap();

    let err = s.create(draft("7429-90-5")).await.unwrap_err();
    assert!(matches!(err, Error::DuplicateCas(cas) if cas == "7429-90-5"));
    assert_eq!(s.list_all().await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn get_by_cas_round_trips_properties() {
    let s = MemoryStore::new();
    let created = s.create(draft("7429-90-5")).await.unwrap();

    let fetched = s.get_by_cas("7429-90-5").await.unwrap().unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.cas_number, "7429-90-5");
    assert_eq!(fetched.properties, created.properties);
  }

  #[tokio::test]
  async fn get_by_cas_missing_returns_none() {
    let s = MemoryStore::new();
    assert!(s.get_by_cas("50-00-0").await.unwrap().is_none());
  }

  #[tokio::test]
  async fn list_all_returns_every_row() {
    let s = MemoryStore::new();
    assert!(s.list_all().await.unwrap().is_empty());

    s.create(draft("7429-90-5")).await.unwrap();
    s.create(draft("50-00-0")).await.unwrap();
    s.create(draft("64-17-5")).await.unwrap();

    let all = s.list_all().await.unwrap();
    assert_eq!(all.len(), 3);
  }

  #[tokio::test]
  async fn delete_by_cas_is_check_then_act() {
    let s = MemoryStore::new();
    s.create(draft("7429-90-5")).await.unwrap();

    assert!(s.delete_by_cas("7429-90-5").await.unwrap());
    assert!(!s.delete_by_cas("7429-90-5").await.unwrap());
    assert!(s.list_all().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn deleted_id_is_not_reused() {
    let s = MemoryStore::new();
    s.create(draft("7429-90-5")).await.unwrap();
    s.delete_by_cas("7429-90-5").await.unwrap();

    let next = s.create(draft("50-00-0")).await.unwrap();
    assert_eq!(next.id, 2);
  }
}
