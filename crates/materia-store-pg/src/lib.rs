//! PostgreSQL backend for the material store.
//!
//! Wraps an [`sqlx`] connection pool; every store round trip borrows one
//! pooled connection and returns it before the call completes.

mod schema;
mod store;

pub mod config;
pub mod error;

pub use config::DbConfig;
pub use error::{Error, Result};
pub use store::PgStore;
