//! Error types for `materia-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The CAS number does not match the `digits-digits-digit` shape.
  #[error("invalid CAS number: {0:?}")]
  InvalidCasNumber(String),

  /// A material with this CAS number already exists.
  #[error("CAS number {0} already exists")]
  DuplicateCas(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
