//! statline dashboard server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens
//! the per-subject SQLite stores produced by the `scrape` binary, and
//! serves the read-only dashboard API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use axum::Router;
use clap::Parser;
use statline_api::{DashContext, ServerConfig, api_router};
use statline_core::subject::Subject;
use statline_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "statline dashboard server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
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

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("STATLINE"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Open one store per roster subject.
  let mut entries = Vec::new();
  for subject in Subject::default_roster() {
    let path = server_cfg.data_dir.join(subject.store_file());
    if !path.exists() {
      tracing::warn!(
        "store file {} missing; {} will have no tables",
        path.display(),
        subject.name
      );
    }
    let store = SqliteStore::open(&path)
      .await
      .with_context(|| format!("failed to open store at {}", path.display()))?;
    entries.push((subject, store));
  }

  let ctx = Arc::new(DashContext::new(entries));

  let app = Router::new()
    .nest("/api", api_router(ctx))
    .layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
