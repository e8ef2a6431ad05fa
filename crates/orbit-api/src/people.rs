//! Handlers for `/api/people` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/api/people` | Everyone, name ascending |
//! | `POST`   | `/api/people` | Body: [`CreateBody`]; 201 + stored person |
//! | `PUT`    | `/api/people/:id` | Sparse patch; 404 if not found |
//! | `DELETE` | `/api/people/:id` | Unconditional; 204 even if absent |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use orbit_core::{
  person::{NewPerson, Person, PersonPatch, PersonSource},
  store::RelationStore,
};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::error::ApiError;

// ─── Shared validation ────────────────────────────────────────────────────────

fn parse_source(s: &str) -> Option<PersonSource> {
  match s {
    "manual" => Some(PersonSource::Manual),
    "contacts" => Some(PersonSource::Contacts),
    _ => None,
  }
}

/// Validate a context label against the group table and return the group's
/// canonical name (matching is case-insensitive; storage keeps the group's
/// own casing).
async fn resolve_context<S>(store: &S, label: &str) -> Result<String, ApiError>
where
  S: RelationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let group = store
    .group_by_name(label)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  match group {
    Some(g) => Ok(g.group_name),
    None => Err(ApiError::BadRequest(format!("unknown group context: {label:?}"))),
  }
}

/// Distinguish an absent field from an explicit `null` in a PATCH-style body.
fn double_option<'de, D>(de: D) -> Result<Option<Option<String>>, D::Error>
where
  D: Deserializer<'de>,
{
  Option::<String>::deserialize(de).map(Some)
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /api/people`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<Person>>, ApiError>
where
  S: RelationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let people = store
    .list_people()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(people))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:    String,
  #[serde(default)]
  pub context: Option<String>,
  /// Defaults to `manual` when absent.
  pub source:  Option<String>,
}

/// `POST /api/people`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RelationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let name = body.name.trim().to_owned();
  if name.is_empty() {
    return Err(ApiError::BadRequest("name is required".to_owned()));
  }

  let source = match body.source.as_deref() {
    None => PersonSource::Manual,
    Some(s) => parse_source(s)
      .ok_or_else(|| ApiError::BadRequest("source must be manual or contacts".to_owned()))?,
  };

  let context = match body.context.as_deref() {
    Some(label) => Some(resolve_context(store.as_ref(), label).await?),
    None => None,
  };

  let person = store
    .add_person(NewPerson { name, context, source })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(person)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// Sparse patch body: absent fields stay untouched; `"context": null`
/// explicitly clears the label.
#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub name:    Option<String>,
  #[serde(default, deserialize_with = "double_option")]
  pub context: Option<Option<String>>,
  pub source:  Option<String>,
}

/// `PUT /api/people/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<Person>, ApiError>
where
  S: RelationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut patch = PersonPatch::default();

  if let Some(name) = body.name {
    let name = name.trim().to_owned();
    if name.is_empty() {
      return Err(ApiError::BadRequest("name must be non-empty".to_owned()));
    }
    patch.name = Some(name);
  }
  if let Some(context) = body.context {
    patch.context = Some(match context.as_deref() {
      Some(label) => Some(resolve_context(store.as_ref(), label).await?),
      None => None,
    });
  }
  if let Some(source) = body.source {
    patch.source = Some(
      parse_source(&source)
        .ok_or_else(|| ApiError::BadRequest("invalid source".to_owned()))?,
    );
  }

  let person = store
    .update_person(id, patch)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  Ok(Json(person))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /api/people/:id` — unconditional; 204 even if the person is gone.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: RelationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .delete_person(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}
