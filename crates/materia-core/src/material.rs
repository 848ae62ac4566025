//! Material — a chemical entry keyed by its CAS registry number.
//!
//! The entity shape is kept separate from the storage schema; backends
//! declare their own column mapping and convert into these types on read.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The open-ended key→value map of physical/chemical attributes attached to
/// a material. Keys are strings, values arbitrary JSON.
pub type PropertyMap = serde_json::Map<String, serde_json::Value>;

/// CAS registry numbers: 2–7 digits, dash, 2 digits, dash, 1 digit
/// (e.g. "7429-90-5").
static CAS_NUMBER_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\d{2,7}-\d{2}-\d$").expect("CAS number regex"));

// ─── Entity ──────────────────────────────────────────────────────────────────

/// A persisted material record. `id` and both timestamps are assigned by the
/// store; `cas_number` is immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
  pub id:          i64,
  pub cas_number:  String,
  pub properties:  PropertyMap,
  pub create_time: DateTime<Utc>,
  pub update_time: DateTime<Utc>,
}

// ─── Input shapes ────────────────────────────────────────────────────────────

/// Payload for creating a material. Both fields are required; `properties`
/// must be a JSON object (it may be empty).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialDraft {
  pub cas_number: String,
  pub properties: PropertyMap,
}

impl MaterialDraft {
  /// Check the CAS number shape. Presence and type of `properties` are
  /// already enforced by deserialisation.
  pub fn validate(&self) -> Result<()> {
    if !CAS_NUMBER_RE.is_match(&self.cas_number) {
      return Err(Error::InvalidCasNumber(self.cas_number.clone()));
    }
    Ok(())
  }
}

/// Payload shape for partial updates. No endpoint is wired to it; it exists
/// so the contract covers the full set of request shapes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaterialPatch {
  pub properties: Option<PropertyMap>,
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn draft(cas: &str) -> MaterialDraft {
    MaterialDraft {
      cas_number: cas.to_string(),
      properties: PropertyMap::new(),
    }
  }

  #[test]
  fn accepts_well_formed_cas_numbers() {
    for cas in ["7429-90-5", "50-00-0", "1234567-89-0"] {
      assert!(draft(cas).validate().is_ok(), "rejected {cas}");
    }
  }

  #[test]
  fn rejects_malformed_cas_numbers() {
    for cas in [
      "abc",
      "7429-90-55", // final group must be one digit
      "7-90-5",     // first group needs at least two digits
      "12345678-90-5",
      "7429-9-5",
      "7429 90 5",
      "",
      "7429-90-5 ",
    ] {
      assert!(
        matches!(draft(cas).validate(), Err(Error::InvalidCasNumber(_))),
        "accepted {cas:?}"
      );
    }
  }

  #[test]
  fn draft_requires_properties_field() {
    let missing: std::result::Result<MaterialDraft, _> =
      serde_json::from_str(r#"{"cas_number":"7429-90-5"}"#);
    assert!(missing.is_err());

    let empty: MaterialDraft =
      serde_json::from_str(r#"{"cas_number":"7429-90-5","properties":{}}"#)
        .unwrap();
    assert!(empty.properties.is_empty());
  }

  #[test]
  fn draft_rejects_non_object_properties() {
    let arr: std::result::Result<MaterialDraft, _> = serde_json::from_str(
      r#"{"cas_number":"7429-90-5","properties":["not","a","map"]}"#,
    );
    assert!(arr.is_err());
  }

  #[test]
  fn patch_fields_are_optional() {
    let patch: MaterialPatch = serde_json::from_str("{}").unwrap();
    assert!(patch.properties.is_none());

    let patch: MaterialPatch =
      serde_json::from_str(r#"{"properties":{"密度":"2.7 g/cm³"}}"#).unwrap();
    assert_eq!(
      patch.properties.unwrap()["密度"],
      serde_json::json!("2.7 g/cm³")
    );
  }
}
