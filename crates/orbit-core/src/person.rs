//! Person — an individual the user keeps in touch with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a person entered the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonSource {
  /// Typed in by the user directly.
  Manual,
  /// Imported from the device address book.
  Contacts,
}

/// A tracked person. `context` is the name of the group the person belongs
/// to; it references `group_context` at the store level and clears to `None`
/// when that group is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
  pub id:         Uuid,
  pub name:       String,
  pub context:    Option<String>,
  pub source:     PersonSource,
  /// Store-assigned timestamp; never changes after creation.
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::RelationStore::add_person`].
/// `id` and `created_at` are always assigned by the store.
#[derive(Debug, Clone)]
pub struct NewPerson {
  pub name:    String,
  pub context: Option<String>,
  pub source:  PersonSource,
}

/// A sparse update: `None` fields are left untouched. The nested option on
/// `context` distinguishes "don't touch" from "clear to null".
#[derive(Debug, Clone, Default)]
pub struct PersonPatch {
  pub name:    Option<String>,
  pub context: Option<Option<String>>,
  pub source:  Option<PersonSource>,
}

impl PersonPatch {
  pub fn is_empty(&self) -> bool {
    self.name.is_none() && self.context.is_none() && self.source.is_none()
  }
}
