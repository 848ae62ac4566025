//! Connection and pool configuration for the Postgres store.

use std::time::Duration;

use sqlx::postgres::PgConnectOptions;

/// Baseline number of pooled connections kept open.
pub const POOL_SIZE: u32 = 10;

/// Additional connections allowed beyond the baseline under load.
pub const MAX_OVERFLOW: u32 = 20;

/// How long a request waits for a pooled connection before failing.
pub const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Pooled connections are recycled after this lifetime to tolerate
/// database restarts.
pub const RECYCLE_AFTER: Duration = Duration::from_secs(3600);

/// Database connection parameters.
///
/// Credentials are handed to the driver as discrete fields, so no
/// URL escaping is needed regardless of what the password contains.
#[derive(Debug, Clone)]
pub struct DbConfig {
  pub user:     String,
  pub password: String,
  pub host:     String,
  pub port:     u16,
  pub name:     String,
}

impl Default for DbConfig {
  fn default() -> Self {
    Self {
      user:     "app_user".to_string(),
      password: "default_password".to_string(),
      host:     "db".to_string(),
      port:     5432,
      name:     "material_db".to_string(),
    }
  }
}

impl DbConfig {
  pub fn connect_options(&self) -> PgConnectOptions {
    PgConnectOptions::new()
      .username(&self.user)
      .password(&self.password)
      .host(&self.host)
      .port(self.port)
      .database(&self.name)
  }
}
