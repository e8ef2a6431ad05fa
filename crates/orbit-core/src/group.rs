//! Group — a user-defined tag that people can carry as their `context`.
//!
//! Group names are unique case-insensitively; the store enforces this and
//! uses the name as the target of the `person.context` reference.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display color assigned when the caller doesn't provide one.
pub const DEFAULT_GROUP_COLOR: &str = "#9e9e9e";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
  pub group_id:   Uuid,
  pub group_name: String,
  /// Display color, e.g. `#9e9e9e`.
  pub color:      String,
}

/// Input to [`crate::store::RelationStore::add_group`].
#[derive(Debug, Clone)]
pub struct NewGroup {
  pub group_name: String,
  pub color:      String,
}

/// A sparse update: `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct GroupPatch {
  pub group_name: Option<String>,
  pub color:      Option<String>,
}

impl GroupPatch {
  pub fn is_empty(&self) -> bool {
    self.group_name.is_none() && self.color.is_none()
  }
}
