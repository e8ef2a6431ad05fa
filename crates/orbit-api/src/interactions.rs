//! Handlers for `/api/interactions` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/api/interactions` | Body: [`RecordBody`]; 201 + the day |
//! | `GET`    | `/api/interactions` | All days, newest first |
//! | `DELETE` | `/api/interactions/:date` | Day + all memberships; 404 if absent |
//! | `GET`    | `/api/interactions/:date/people` | Empty list when nothing recorded |
//! | `DELETE` | `/api/interactions/:date/people/:person_id` | Undo; 204 no-op when the date was never recorded |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use orbit_core::{interaction::Interaction, person::Person, store::RelationStore};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

// ─── Shared validation ────────────────────────────────────────────────────────

fn parse_date(s: &str) -> Result<NaiveDate, ApiError> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|_| ApiError::BadRequest("date (YYYY-MM-DD) is required".to_owned()))
}

// ─── Record ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordBody {
  pub date:       String,
  #[serde(default)]
  pub person_ids: Vec<String>,
}

/// `POST /api/interactions` — body: `{"date":"2024-05-01","personIds":[...]}`.
///
/// Find-or-create for the date plus idempotent attachment, atomically;
/// resubmitting the same payload is harmless.
pub async fn record<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<RecordBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RelationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let date = parse_date(&body.date)?;

  let person_ids = body
    .person_ids
    .iter()
    .map(|s| Uuid::parse_str(s))
    .collect::<Result<Vec<_>, _>>()
    .map_err(|_| ApiError::BadRequest("personIds must be UUIDs".to_owned()))?;

  let interaction = store
    .record_interaction(date, person_ids)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(interaction)))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /api/interactions`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Interaction>>, ApiError>
where
  S: RelationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let interactions = store
    .list_interactions()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(interactions))
}

// ─── Day members ──────────────────────────────────────────────────────────────

/// `GET /api/interactions/:date/people` — the empty list is the valid
/// "nothing recorded that day" answer, not an error.
pub async fn day_people<S>(
  State(store): State<Arc<S>>,
  Path(date): Path<String>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: RelationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let date = parse_date(&date)?;

  let interaction = store
    .interaction_for_date(date)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let Some(interaction) = interaction else {
    return Ok(Json(Vec::new()));
  };

  let people = store
    .people_for_interaction(interaction.id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(people))
}

// ─── Undo ─────────────────────────────────────────────────────────────────────

/// `DELETE /api/interactions/:date/people/:person_id` — detach one person
/// from one day. Idempotent all the way down: an unrecorded date or an
/// absent membership both answer 204.
pub async fn undo<S>(
  State(store): State<Arc<S>>,
  Path((date, person_id)): Path<(String, Uuid)>,
) -> Result<StatusCode, ApiError>
where
  S: RelationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let date = parse_date(&date)?;

  let interaction = store
    .interaction_for_date(date)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if let Some(interaction) = interaction {
    store
      .remove_person(interaction.id, person_id)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?;
  }
  Ok(StatusCode::NO_CONTENT)
}

// ─── Delete day ───────────────────────────────────────────────────────────────

/// `DELETE /api/interactions/:date` — remove the day record and,
/// transitively, all its memberships.
pub async fn delete_day<S>(
  State(store): State<Arc<S>>,
  Path(date): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: RelationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let date = parse_date(&date)?;

  let interaction = store
    .interaction_for_date(date)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("no interaction recorded for {date}")))?;

  store
    .delete_interaction(interaction.id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}
