//! Handlers for `/tables` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/tables` | Logical tables across all subjects |
//! | `GET`  | `/tables/:name` | Every subject's version; 404 if nobody has it |
//! | `GET`  | `/tables/:name/summary?columns=a,b` | Sum/mean per column per subject |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use statline_core::{
  Error as CoreError,
  store::TableStore,
  subject::Subject,
  summary::{ColumnStats, column_stats},
};

use crate::{
  context::{DashContext, TableListing},
  error::ApiError,
};

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /tables`
pub async fn list<S>(
  State(ctx): State<Arc<DashContext<S>>>,
) -> Result<Json<Vec<TableListing>>, ApiError>
where
  S: TableStore,
{
  let tables = ctx.list_tables().await.map_err(ApiError::store)?;
  Ok(Json(tables))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SubjectTable {
  pub subject: Subject,
  pub title:   String,
  pub columns: Vec<String>,
  pub rows:    Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct TableResponse {
  pub name:     String,
  pub versions: Vec<SubjectTable>,
}

/// `GET /tables/:name`
pub async fn get_one<S>(
  State(ctx): State<Arc<DashContext<S>>>,
  Path(name): Path<String>,
) -> Result<Json<TableResponse>, ApiError>
where
  S: TableStore,
{
  let versions = ctx
    .table_versions(&name)
    .await
    .map_err(ApiError::store)?;
  if versions.is_empty() {
    return Err(ApiError::NotFound(format!("table {name} not found")));
  }

  let versions = versions
    .into_iter()
    .map(|(subject, cached)| {
      let (meta, data) = cached.as_ref();
      SubjectTable {
        subject,
        title: meta.title.clone(),
        columns: data.columns.clone(),
        rows: data.rows.clone(),
      }
    })
    .collect();

  Ok(Json(TableResponse { name, versions }))
}

// ─── Summary ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SummaryParams {
  /// Comma-separated column names, e.g. `PTS,AST`.
  pub columns: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubjectSummary {
  pub subject: Subject,
  pub stats:   Vec<ColumnStats>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
  pub name:     String,
  pub subjects: Vec<SubjectSummary>,
}

/// `GET /tables/:name/summary?columns=PTS,AST`
pub async fn summary<S>(
  State(ctx): State<Arc<DashContext<S>>>,
  Path(name): Path<String>,
  Query(params): Query<SummaryParams>,
) -> Result<Json<SummaryResponse>, ApiError>
where
  S: TableStore,
{
  let columns: Vec<String> = params
    .columns
    .unwrap_or_default()
    .split(',')
    .map(|c| c.trim().to_owned())
    .filter(|c| !c.is_empty())
    .collect();
  if columns.is_empty() {
    return Err(ApiError::BadRequest("no columns selected".to_string()));
  }

  let versions = ctx
    .table_versions(&name)
    .await
    .map_err(ApiError::store)?;
  if versions.is_empty() {
    return Err(ApiError::NotFound(format!("table {name} not found")));
  }

  let mut subjects = Vec::with_capacity(versions.len());
  for (subject, cached) in versions {
    let (_, data) = cached.as_ref();
    let mut stats = Vec::with_capacity(columns.len());
    for column in &columns {
      let s = column_stats(data, column).map_err(|e| match e {
        CoreError::ColumnNotFound(c) => ApiError::BadRequest(format!(
          "column {c:?} not in {name} for {}",
          subject.slug
        )),
      })?;
      stats.push(s);
    }
    subjects.push(SubjectSummary { subject, stats });
  }

  Ok(Json(SummaryResponse { name, subjects }))
}
