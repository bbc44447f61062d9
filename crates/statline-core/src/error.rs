//! Error types for `statline-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("column not found: {0}")]
  ColumnNotFound(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
