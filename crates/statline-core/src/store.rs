//! The `TableStore` trait.
//!
//! Implemented by storage backends (e.g. `statline-store-sqlite`).
//! Higher layers (the scrape pipeline, the dashboard API) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use crate::table::{TableData, TableMeta};

/// Abstraction over one subject's table store.
///
/// Writes use replace semantics: `put_table` drops and recreates the
/// named table rather than appending to it, so re-running a scrape
/// overwrites prior contents.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait TableStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Write `data` under `meta.name`, replacing any existing table of
  /// that name and upserting its catalog row.
  fn put_table(
    &self,
    meta: TableMeta,
    data: TableData,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Fetch a stored table with its catalog row. `None` if absent.
  fn get_table<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<(TableMeta, TableData)>, Self::Error>> + Send + 'a;

  /// Catalog existence check — a metadata query, not a scan.
  fn table_exists<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// All catalog rows, ordered by stored name.
  fn list_tables(
    &self,
  ) -> impl Future<Output = Result<Vec<TableMeta>, Self::Error>> + Send + '_;
}
