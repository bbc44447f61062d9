//! JSON REST API for the statline dashboard.
//!
//! Exposes an axum [`Router`] backed by any
//! [`statline_core::store::TableStore`], one store per subject. The
//! surface is strictly read-only: nothing a dashboard session does is
//! persisted back.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", statline_api::api_router(ctx.clone()))
//! ```

pub mod context;
pub mod error;
pub mod subjects;
pub mod tables;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use serde::Deserialize;
use statline_core::store::TableStore;

pub use context::DashContext;
pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
/// Every field falls back to its default when the file is absent.
#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:     String,
  pub port:     u16,
  /// Directory holding the per-subject SQLite files produced by the
  /// scrape run.
  pub data_dir: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:     "127.0.0.1".to_string(),
      port:     8561,
      data_dir: PathBuf::from("data"),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `ctx`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(ctx: Arc<DashContext<S>>) -> Router<()>
where
  S: TableStore + 'static,
{
  Router::new()
    .route("/subjects", get(subjects::list::<S>))
    .route("/tables", get(tables::list::<S>))
    .route("/tables/{name}", get(tables::get_one::<S>))
    .route("/tables/{name}/summary", get(tables::summary::<S>))
    .with_state(ctx)
}
