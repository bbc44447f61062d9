//! Handler for `GET /subjects`.

use std::sync::Arc;

use axum::{Json, extract::State};
use statline_core::{store::TableStore, subject::Subject};

use crate::{DashContext, error::ApiError};

/// `GET /subjects` — the configured roster.
pub async fn list<S>(
  State(ctx): State<Arc<DashContext<S>>>,
) -> Result<Json<Vec<Subject>>, ApiError>
where
  S: TableStore,
{
  Ok(Json(ctx.subjects()))
}
