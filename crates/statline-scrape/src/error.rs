//! Error types for `statline-scrape`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("unexpected status {status} fetching {url}")]
  Status {
    url:    String,
    status: reqwest::StatusCode,
  },

  #[error("bad selector {0:?}: {1}")]
  Selector(String, String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("table {0:?} exists but has no catalog row in its source store")]
  Uncatalogued(String),

  #[error("subject task failed: {0}")]
  Join(#[from] tokio::task::JoinError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
