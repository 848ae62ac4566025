//! materia-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), connects to
//! PostgreSQL, ensures the materials table exists (retrying while the
//! database comes up), and serves the material registry API over HTTP.

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context as _;
use clap::Parser;
use materia_store_pg::{DbConfig, PgStore};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Total attempts to bootstrap the schema before startup is abandoned.
const SCHEMA_SETUP_ATTEMPTS: u32 = 5;
/// Fixed delay between bootstrap attempts.
const SCHEMA_SETUP_DELAY: Duration = Duration::from_secs(2);

#[derive(Parser)]
#[command(author, version, about = "Material registry server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

/// Runtime server configuration. Defaults are overridden first by the
/// config file, then by `MATERIA_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
struct ServerConfig {
  host:        String,
  port:        u16,
  db_user:     String,
  db_password: String,
  db_host:     String,
  db_port:     u16,
  db_name:     String,
}

impl ServerConfig {
  fn db_config(&self) -> DbConfig {
    DbConfig {
      user:     self.db_user.clone(),
      password: self.db_password.clone(),
      host:     self.db_host.clone(),
      port:     self.db_port,
      name:     self.db_name.clone(),
    }
  }
}

fn load_config(path: PathBuf) -> anyhow::Result<ServerConfig> {
  let defaults = DbConfig::default();
  let settings = config::Config::builder()
    .set_default("host", "0.0.0.0")?
    .set_default("port", 8000_i64)?
    .set_default("db_user", defaults.user)?
    .set_default("db_password", defaults.password)?
    .set_default("db_host", defaults.host)?
    .set_default("db_port", i64::from(defaults.port))?
    .set_default("db_name", defaults.name)?
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("MATERIA"))
    .build()
    .context("failed to read config file")?;

  settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let server_cfg = load_config(cli.config)?;

  // The pool is lazy; the retried schema bootstrap below is the first
  // contact with the database.
  let store = PgStore::connect(&server_cfg.db_config());
  store
    .ensure_schema_with_retry(SCHEMA_SETUP_ATTEMPTS, SCHEMA_SETUP_DELAY)
    .await
    .context("database never became reachable")?;

  let store = Arc::new(store);
  let app = materia_api::api_router(store.clone())
    .layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(wait_for_shutdown_signal())
    .await
    .context("server error")?;

  // Drain the pool before reporting a clean exit.
  tracing::info!("closing database connection pool");
  store.close().await;
  tracing::info!("database connections released");

  Ok(())
}

async fn wait_for_shutdown_signal() {
  #[cfg(unix)]
  {
    use tokio::signal::unix::{SignalKind, signal};
    let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
    let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
    tokio::select! {
      _ = sigterm.recv() => {}
      _ = sigint.recv() => {}
    }
  }
  #[cfg(not(unix))]
  {
    let _ = tokio::signal::ctrl_c().await;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_config_file_falls_back_to_defaults() {
    let cfg = load_config(PathBuf::from("/nonexistent/config.toml")).unwrap();
    assert_eq!(cfg.host, "0.0.0.0");
    assert_eq!(cfg.port, 8000);

    let db = cfg.db_config();
    assert_eq!(db.user, "app_user");
    assert_eq!(db.host, "db");
    assert_eq!(db.port, 5432);
    assert_eq!(db.name, "material_db");
  }
}
