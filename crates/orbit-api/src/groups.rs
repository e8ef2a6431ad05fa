//! Handlers for `/api/groups` endpoints.
//!
//! Group names are unique case-insensitively; collisions are reported here as
//! validation failures before the store's constraint would fire.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use orbit_core::{
  group::{Group, GroupPatch, NewGroup, DEFAULT_GROUP_COLOR},
  store::RelationStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /api/groups`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<Group>>, ApiError>
where
  S: RelationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let groups = store
    .list_groups()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(groups))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub group_name: String,
  /// Defaults to [`DEFAULT_GROUP_COLOR`] when absent.
  pub color:      Option<String>,
}

/// `POST /api/groups`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RelationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let group_name = body.group_name.trim().to_owned();
  if group_name.is_empty() {
    return Err(ApiError::BadRequest("group_name is required".to_owned()));
  }

  let taken = store
    .group_by_name(&group_name)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if taken.is_some() {
    return Err(ApiError::BadRequest(format!(
      "group name already taken: {group_name:?}"
    )));
  }

  let group = store
    .add_group(NewGroup {
      group_name,
      color: body.color.unwrap_or_else(|| DEFAULT_GROUP_COLOR.to_owned()),
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(group)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub group_name: Option<String>,
  pub color:      Option<String>,
}

/// `PUT /api/groups/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<Group>, ApiError>
where
  S: RelationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut patch = GroupPatch::default();

  if let Some(name) = body.group_name {
    let name = name.trim().to_owned();
    if name.is_empty() {
      return Err(ApiError::BadRequest("group_name must be non-empty".to_owned()));
    }

    // A rename may collide with another group; renaming to a different
    // casing of the group's own name is fine.
    let taken = store
      .group_by_name(&name)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?;
    if let Some(other) = taken
      && other.group_id != id
    {
      return Err(ApiError::BadRequest(format!("group name already taken: {name:?}")));
    }

    patch.group_name = Some(name);
  }
  if let Some(color) = body.color {
    patch.color = Some(color);
  }

  let group = store
    .update_group(id, patch)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("group {id} not found")))?;
  Ok(Json(group))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /api/groups/:id` — 404 if the group does not exist.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: RelationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .get_group(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("group {id} not found")))?;

  store
    .delete_group(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}
