//! Handler for `GET /health`.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use orbit_core::store::RelationStore;
use serde_json::json;

/// `GET /health` — round-trips the store and reports reachability.
pub async fn handler<S>(State(store): State<Arc<S>>) -> impl IntoResponse
where
  S: RelationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  match store.ping().await {
    Ok(()) => (
      StatusCode::OK,
      Json(json!({ "status": "ok", "db": "connected" })),
    ),
    Err(e) => {
      tracing::warn!("health check failed: {e}");
      (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "status": "error", "db": "unreachable" })),
      )
    }
  }
}
