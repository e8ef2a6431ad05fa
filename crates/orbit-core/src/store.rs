//! The `RelationStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `orbit-store-sqlite`).
//! Higher layers (`orbit-api`) depend on this abstraction, not on any
//! concrete backend, and receive their store handle at construction.

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  group::{Group, GroupPatch, NewGroup},
  interaction::Interaction,
  person::{NewPerson, Person, PersonPatch},
  stats::{RangeFilter, Stats},
};

/// Abstraction over an Orbit storage backend.
///
/// Reads and single-row writes are plain statements; the only multi-statement
/// operation is [`record_interaction`](Self::record_interaction), which the
/// backend must run as one atomic transaction.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RelationStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── People ────────────────────────────────────────────────────────────

  /// Create and persist a new person. `id` and `created_at` are assigned by
  /// the store.
  fn add_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Retrieve a person by id. Returns `None` if not found.
  fn get_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// List every person, ordered by name ascending.
  fn list_people(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Apply a sparse patch. Fields absent from the patch are left untouched.
  /// Returns `None` if the person does not exist.
  fn update_person(
    &self,
    id: Uuid,
    patch: PersonPatch,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Delete a person and, transitively, their interaction memberships.
  /// Deleting an absent person is not an error.
  fn delete_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Groups ────────────────────────────────────────────────────────────

  /// Create and persist a new group. Fails if the name is already taken
  /// (case-insensitively).
  fn add_group(
    &self,
    input: NewGroup,
  ) -> impl Future<Output = Result<Group, Self::Error>> + Send + '_;

  /// Retrieve a group by id. Returns `None` if not found.
  fn get_group(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Group>, Self::Error>> + Send + '_;

  /// Look up a group by name, case-insensitively.
  fn group_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Group>, Self::Error>> + Send + 'a;

  /// List every group, ordered by name ascending.
  fn list_groups(
    &self,
  ) -> impl Future<Output = Result<Vec<Group>, Self::Error>> + Send + '_;

  /// Apply a sparse patch. Renaming a group cascades into every person
  /// carrying it as their `context`. Returns `None` if the group does not
  /// exist.
  fn update_group(
    &self,
    id: Uuid,
    patch: GroupPatch,
  ) -> impl Future<Output = Result<Option<Group>, Self::Error>> + Send + '_;

  /// Delete a group; people carrying it as their `context` are cleared to
  /// null. Deleting an absent group is not an error.
  fn delete_group(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Interaction recording ─────────────────────────────────────────────

  /// Find-or-create the interaction-day for `date` and idempotently attach
  /// `person_ids` to it, as a single atomic transaction. On any failure the
  /// whole call rolls back — partial attachment is never observable.
  ///
  /// Concurrent calls for the same date race first-insert-wins; the loser
  /// resolves the existing row without error.
  fn record_interaction(
    &self,
    date: NaiveDate,
    person_ids: Vec<Uuid>,
  ) -> impl Future<Output = Result<Interaction, Self::Error>> + Send + '_;

  /// Resolve a date to its interaction-day. `None` is the valid "nothing
  /// recorded that day" state.
  fn interaction_for_date(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Option<Interaction>, Self::Error>> + Send + '_;

  /// List every interaction-day, newest first.
  fn list_interactions(
    &self,
  ) -> impl Future<Output = Result<Vec<Interaction>, Self::Error>> + Send + '_;

  /// Delete an interaction-day and, transitively, all its memberships.
  /// Deleting an absent day is not an error.
  fn delete_interaction(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The people attached to an interaction-day, ordered by name ascending.
  fn people_for_interaction(
    &self,
    interaction_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Detach one person from one interaction-day. Absence of the membership
  /// row is not an error.
  fn remove_person(
    &self,
    interaction_id: Uuid,
    person_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Aggregation ───────────────────────────────────────────────────────

  /// Run both aggregate queries over the window `range` selects. Read-only;
  /// safe to run concurrently with the recorder.
  fn compute_stats(
    &self,
    range: RangeFilter,
  ) -> impl Future<Output = Result<Stats, Self::Error>> + Send + '_;

  // ── Health ────────────────────────────────────────────────────────────

  /// Round-trip a trivial statement to verify the store is reachable.
  fn ping(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
