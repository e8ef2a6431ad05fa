//! Handler for `GET /api/stats`.
//!
//! `filter` is `all | year | month`; `period` is `YYYY` or `YYYY-MM`
//! accordingly. A malformed pair degrades to the unbounded window — the
//! documented fallback, not an error.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use orbit_core::{
  stats::{RangeFilter, Stats},
  store::RelationStore,
};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize, Default)]
pub struct StatsParams {
  pub filter: Option<String>,
  pub period: Option<String>,
}

/// `GET /api/stats[?filter=year&period=2024]`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<StatsParams>,
) -> Result<Json<Stats>, ApiError>
where
  S: RelationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let range = RangeFilter::from_params(
    params.filter.as_deref().unwrap_or("all"),
    params.period.as_deref().unwrap_or(""),
  );

  let stats = store
    .compute_stats(range)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(stats))
}
