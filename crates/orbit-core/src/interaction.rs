//! Interaction-day — the set of people interacted with on a calendar date.
//!
//! The date is the sole identity key: the store holds at most one row per
//! date, and the membership join (`interaction_person`) carries who was part
//! of it. Recording against an existing date reuses the row.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
  pub id:         Uuid,
  /// Calendar date (`YYYY-MM-DD`); unique across the store.
  pub date:       NaiveDate,
  pub created_at: DateTime<Utc>,
}
