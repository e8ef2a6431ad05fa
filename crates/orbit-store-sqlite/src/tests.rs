//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use orbit_core::{
  group::{GroupPatch, NewGroup, DEFAULT_GROUP_COLOR},
  person::{NewPerson, PersonPatch, PersonSource},
  stats::RangeFilter,
  store::RelationStore,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_person(name: &str) -> NewPerson {
  NewPerson {
    name:    name.to_owned(),
    context: None,
    source:  PersonSource::Manual,
  }
}

fn new_group(name: &str) -> NewGroup {
  NewGroup {
    group_name: name.to_owned(),
    color:      DEFAULT_GROUP_COLOR.to_owned(),
  }
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ─── People ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_person() {
  let s = store().await;

  let person = s.add_person(new_person("Alice")).await.unwrap();
  assert_eq!(person.name, "Alice");
  assert_eq!(person.source, PersonSource::Manual);
  assert!(person.context.is_none());

  let fetched = s.get_person(person.id).await.unwrap().unwrap();
  assert_eq!(fetched.id, person.id);
  assert_eq!(fetched.name, "Alice");
  assert_eq!(fetched.created_at, person.created_at);
}

#[tokio::test]
async fn get_person_missing_returns_none() {
  let s = store().await;
  assert!(s.get_person(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_people_ordered_by_name() {
  let s = store().await;
  s.add_person(new_person("Carol")).await.unwrap();
  s.add_person(new_person("Alice")).await.unwrap();
  s.add_person(new_person("Bob")).await.unwrap();

  let people = s.list_people().await.unwrap();
  let names: Vec<_> = people.iter().map(|p| p.name.as_str()).collect();
  assert_eq!(names, ["Alice", "Bob", "Carol"]);
}

#[tokio::test]
async fn update_person_name_only_leaves_other_fields() {
  let s = store().await;
  s.add_group(new_group("friends")).await.unwrap();

  let person = s
    .add_person(NewPerson {
      name:    "Alice".into(),
      context: Some("friends".into()),
      source:  PersonSource::Contacts,
    })
    .await
    .unwrap();

  let updated = s
    .update_person(person.id, PersonPatch {
      name: Some("Alicia".into()),
      ..Default::default()
    })
    .await
    .unwrap()
    .unwrap();

  assert_eq!(updated.name, "Alicia");
  assert_eq!(updated.context.as_deref(), Some("friends"));
  assert_eq!(updated.source, PersonSource::Contacts);
}

#[tokio::test]
async fn update_person_clears_context_explicitly() {
  let s = store().await;
  s.add_group(new_group("friends")).await.unwrap();

  let person = s
    .add_person(NewPerson {
      name:    "Alice".into(),
      context: Some("friends".into()),
      source:  PersonSource::Manual,
    })
    .await
    .unwrap();

  let updated = s
    .update_person(person.id, PersonPatch {
      context: Some(None),
      ..Default::default()
    })
    .await
    .unwrap()
    .unwrap();

  assert!(updated.context.is_none());
}

#[tokio::test]
async fn update_person_missing_returns_none() {
  let s = store().await;
  let result = s
    .update_person(Uuid::new_v4(), PersonPatch {
      name: Some("Ghost".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn empty_patch_returns_current_person() {
  let s = store().await;
  let person = s.add_person(new_person("Alice")).await.unwrap();

  let same = s
    .update_person(person.id, PersonPatch::default())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(same.name, "Alice");
}

#[tokio::test]
async fn delete_person_cascades_memberships() {
  let s = store().await;
  let person = s.add_person(new_person("Alice")).await.unwrap();
  let interaction = s
    .record_interaction(day(2024, 5, 1), vec![person.id])
    .await
    .unwrap();

  s.delete_person(person.id).await.unwrap();

  assert!(s.get_person(person.id).await.unwrap().is_none());
  let members = s.people_for_interaction(interaction.id).await.unwrap();
  assert!(members.is_empty());
}

#[tokio::test]
async fn delete_person_absent_is_not_an_error() {
  let s = store().await;
  s.delete_person(Uuid::new_v4()).await.unwrap();
}

#[tokio::test]
async fn person_with_unknown_context_is_rejected() {
  let s = store().await;
  let err = s
    .add_person(NewPerson {
      name:    "Alice".into(),
      context: Some("nonexistent".into()),
      source:  PersonSource::Manual,
    })
    .await;
  assert!(err.is_err());
}

// ─── Groups ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_group() {
  let s = store().await;

  let group = s
    .add_group(NewGroup {
      group_name: "climbing".into(),
      color:      "#ff0000".into(),
    })
    .await
    .unwrap();

  let fetched = s.get_group(group.group_id).await.unwrap().unwrap();
  assert_eq!(fetched.group_name, "climbing");
  assert_eq!(fetched.color, "#ff0000");
}

#[tokio::test]
async fn group_by_name_is_case_insensitive() {
  let s = store().await;
  let group = s.add_group(new_group("Friends")).await.unwrap();

  let found = s.group_by_name("fRIENDS").await.unwrap().unwrap();
  assert_eq!(found.group_id, group.group_id);
  assert!(s.group_by_name("family").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_group_name_errors_case_insensitively() {
  let s = store().await;
  s.add_group(new_group("Friends")).await.unwrap();
  assert!(s.add_group(new_group("friends")).await.is_err());
}

#[tokio::test]
async fn list_groups_ordered_by_name() {
  let s = store().await;
  s.add_group(new_group("work")).await.unwrap();
  s.add_group(new_group("family")).await.unwrap();

  let groups = s.list_groups().await.unwrap();
  let names: Vec<_> = groups.iter().map(|g| g.group_name.as_str()).collect();
  assert_eq!(names, ["family", "work"]);
}

#[tokio::test]
async fn rename_group_cascades_into_person_context() {
  let s = store().await;
  s.add_group(new_group("friends")).await.unwrap();
  let group = s.group_by_name("friends").await.unwrap().unwrap();

  let person = s
    .add_person(NewPerson {
      name:    "Alice".into(),
      context: Some("friends".into()),
      source:  PersonSource::Manual,
    })
    .await
    .unwrap();

  s.update_group(group.group_id, GroupPatch {
    group_name: Some("close friends".into()),
    ..Default::default()
  })
  .await
  .unwrap()
  .unwrap();

  let refreshed = s.get_person(person.id).await.unwrap().unwrap();
  assert_eq!(refreshed.context.as_deref(), Some("close friends"));
}

#[tokio::test]
async fn delete_group_clears_person_context() {
  let s = store().await;
  let group = s.add_group(new_group("friends")).await.unwrap();

  let person = s
    .add_person(NewPerson {
      name:    "Alice".into(),
      context: Some("friends".into()),
      source:  PersonSource::Manual,
    })
    .await
    .unwrap();

  s.delete_group(group.group_id).await.unwrap();

  let refreshed = s.get_person(person.id).await.unwrap().unwrap();
  assert!(refreshed.context.is_none());
}

#[tokio::test]
async fn update_group_missing_returns_none() {
  let s = store().await;
  let result = s
    .update_group(Uuid::new_v4(), GroupPatch {
      color: Some("#000000".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(result.is_none());
}

// ─── Interaction recording ───────────────────────────────────────────────────

#[tokio::test]
async fn record_interaction_creates_day_and_memberships() {
  let s = store().await;
  let alice = s.add_person(new_person("Alice")).await.unwrap();
  let bob = s.add_person(new_person("Bob")).await.unwrap();

  let interaction = s
    .record_interaction(day(2024, 5, 1), vec![alice.id, bob.id])
    .await
    .unwrap();
  assert_eq!(interaction.date, day(2024, 5, 1));

  let members = s.people_for_interaction(interaction.id).await.unwrap();
  let names: Vec<_> = members.iter().map(|p| p.name.as_str()).collect();
  assert_eq!(names, ["Alice", "Bob"]);
}

#[tokio::test]
async fn recording_same_date_reuses_the_day() {
  let s = store().await;
  let alice = s.add_person(new_person("Alice")).await.unwrap();
  let bob = s.add_person(new_person("Bob")).await.unwrap();

  let first = s
    .record_interaction(day(2024, 5, 1), vec![alice.id])
    .await
    .unwrap();
  let second = s
    .record_interaction(day(2024, 5, 1), vec![bob.id])
    .await
    .unwrap();

  // One row per date; the second call resolves the existing one.
  assert_eq!(first.id, second.id);

  let members = s.people_for_interaction(first.id).await.unwrap();
  assert_eq!(members.len(), 2);
}

#[tokio::test]
async fn attach_twice_yields_one_membership() {
  let s = store().await;
  let alice = s.add_person(new_person("Alice")).await.unwrap();

  // Duplicates within one call and across calls both collapse.
  let interaction = s
    .record_interaction(day(2024, 5, 1), vec![alice.id, alice.id])
    .await
    .unwrap();
  s.record_interaction(day(2024, 5, 1), vec![alice.id])
    .await
    .unwrap();

  let members = s.people_for_interaction(interaction.id).await.unwrap();
  assert_eq!(members.len(), 1);
}

#[tokio::test]
async fn concurrent_recorders_for_same_date_converge() {
  let s = store().await;
  let alice = s.add_person(new_person("Alice")).await.unwrap();
  let bob = s.add_person(new_person("Bob")).await.unwrap();

  let (a, b) = tokio::join!(
    s.record_interaction(day(2024, 5, 1), vec![alice.id]),
    s.record_interaction(day(2024, 5, 1), vec![bob.id]),
  );

  // Neither caller sees a conflict error; both resolve the same row.
  assert_eq!(a.unwrap().id, b.unwrap().id);
}

#[tokio::test]
async fn unknown_person_rolls_back_the_whole_call() {
  let s = store().await;
  let alice = s.add_person(new_person("Alice")).await.unwrap();

  let result = s
    .record_interaction(day(2024, 5, 1), vec![alice.id, Uuid::new_v4()])
    .await;
  assert!(result.is_err());

  // Nothing from the failed call is observable: no day row, no membership.
  assert!(s.interaction_for_date(day(2024, 5, 1)).await.unwrap().is_none());
}

#[tokio::test]
async fn interaction_for_date_absent_is_none() {
  let s = store().await;
  assert!(s.interaction_for_date(day(2030, 1, 1)).await.unwrap().is_none());
}

#[tokio::test]
async fn list_interactions_newest_first() {
  let s = store().await;
  s.record_interaction(day(2024, 1, 1), vec![]).await.unwrap();
  s.record_interaction(day(2024, 3, 1), vec![]).await.unwrap();
  s.record_interaction(day(2024, 2, 1), vec![]).await.unwrap();

  let interactions = s.list_interactions().await.unwrap();
  let dates: Vec<_> = interactions.iter().map(|i| i.date).collect();
  assert_eq!(dates, [day(2024, 3, 1), day(2024, 2, 1), day(2024, 1, 1)]);
}

#[tokio::test]
async fn delete_interaction_cascades_memberships() {
  let s = store().await;
  let alice = s.add_person(new_person("Alice")).await.unwrap();
  let interaction = s
    .record_interaction(day(2024, 5, 1), vec![alice.id])
    .await
    .unwrap();

  s.delete_interaction(interaction.id).await.unwrap();

  assert!(s.interaction_for_date(day(2024, 5, 1)).await.unwrap().is_none());
  let members = s.people_for_interaction(interaction.id).await.unwrap();
  assert!(members.is_empty());
}

#[tokio::test]
async fn remove_person_is_idempotent() {
  let s = store().await;
  let alice = s.add_person(new_person("Alice")).await.unwrap();
  let interaction = s
    .record_interaction(day(2024, 5, 1), vec![alice.id])
    .await
    .unwrap();

  s.remove_person(interaction.id, alice.id).await.unwrap();
  s.remove_person(interaction.id, alice.id).await.unwrap();
  s.remove_person(interaction.id, Uuid::new_v4()).await.unwrap();

  let members = s.people_for_interaction(interaction.id).await.unwrap();
  assert!(members.is_empty());
}

// ─── Aggregation ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn per_day_counts_for_year_and_month_windows() {
  let s = store().await;
  let alice = s.add_person(new_person("Alice")).await.unwrap();
  let bob = s.add_person(new_person("Bob")).await.unwrap();

  s.record_interaction(day(2024, 1, 1), vec![alice.id, bob.id])
    .await
    .unwrap();
  s.record_interaction(day(2024, 2, 1), vec![alice.id])
    .await
    .unwrap();
  s.record_interaction(day(2023, 12, 31), vec![alice.id])
    .await
    .unwrap();

  let year = s.compute_stats(RangeFilter::Year(2024)).await.unwrap();
  let per_day: Vec<_> = year.per_day.iter().map(|d| (d.date, d.count)).collect();
  assert_eq!(per_day, [(day(2024, 2, 1), 1), (day(2024, 1, 1), 2)]);

  let january = s
    .compute_stats(RangeFilter::Month { year: 2024, month: 1 })
    .await
    .unwrap();
  let per_day: Vec<_> = january.per_day.iter().map(|d| (d.date, d.count)).collect();
  assert_eq!(per_day, [(day(2024, 1, 1), 2)]);
}

#[tokio::test]
async fn december_window_rolls_into_next_year() {
  let s = store().await;
  let alice = s.add_person(new_person("Alice")).await.unwrap();

  s.record_interaction(day(2024, 12, 31), vec![alice.id])
    .await
    .unwrap();
  s.record_interaction(day(2025, 1, 1), vec![alice.id])
    .await
    .unwrap();

  let december = s
    .compute_stats(RangeFilter::Month { year: 2024, month: 12 })
    .await
    .unwrap();
  let dates: Vec<_> = december.per_day.iter().map(|d| d.date).collect();
  assert_eq!(dates, [day(2024, 12, 31)]);
}

#[tokio::test]
async fn memberless_days_are_excluded_from_per_day() {
  let s = store().await;
  let alice = s.add_person(new_person("Alice")).await.unwrap();

  s.record_interaction(day(2024, 1, 1), vec![alice.id])
    .await
    .unwrap();
  s.record_interaction(day(2024, 1, 2), vec![]).await.unwrap();

  let stats = s.compute_stats(RangeFilter::All).await.unwrap();
  let dates: Vec<_> = stats.per_day.iter().map(|d| d.date).collect();
  assert_eq!(dates, [day(2024, 1, 1)]);
}

#[tokio::test]
async fn top_orders_by_count_then_name() {
  let s = store().await;
  let bob = s.add_person(new_person("Bob")).await.unwrap();
  let alice = s.add_person(new_person("Alice")).await.unwrap();
  let carol = s.add_person(new_person("Carol")).await.unwrap();

  // Alice and Bob on 5 days each, Carol on 3.
  for d in 1..=5 {
    s.record_interaction(day(2024, 3, d), vec![alice.id, bob.id])
      .await
      .unwrap();
  }
  for d in 1..=3 {
    s.record_interaction(day(2024, 3, d), vec![carol.id])
      .await
      .unwrap();
  }

  let stats = s.compute_stats(RangeFilter::All).await.unwrap();
  let top: Vec<_> = stats
    .top
    .iter()
    .map(|t| (t.name.as_str(), t.count))
    .collect();
  assert_eq!(top, [("Alice", 5), ("Bob", 5), ("Carol", 3)]);
}

#[tokio::test]
async fn top_is_capped_at_ten() {
  let s = store().await;

  let mut ids = Vec::new();
  for i in 0..12 {
    let person = s.add_person(new_person(&format!("Person {i:02}"))).await.unwrap();
    ids.push(person.id);
  }
  s.record_interaction(day(2024, 6, 1), ids).await.unwrap();

  let stats = s.compute_stats(RangeFilter::All).await.unwrap();
  assert_eq!(stats.top.len(), 10);
  // Ties broken alphabetically, so the two last names fall off.
  assert_eq!(stats.top[0].name, "Person 00");
  assert_eq!(stats.top[9].name, "Person 09");
}

#[tokio::test]
async fn top_counts_respect_the_window() {
  let s = store().await;
  let alice = s.add_person(new_person("Alice")).await.unwrap();

  s.record_interaction(day(2023, 6, 1), vec![alice.id])
    .await
    .unwrap();
  s.record_interaction(day(2024, 6, 1), vec![alice.id])
    .await
    .unwrap();

  let all = s.compute_stats(RangeFilter::All).await.unwrap();
  assert_eq!(all.top[0].count, 2);

  let year = s.compute_stats(RangeFilter::Year(2024)).await.unwrap();
  assert_eq!(year.top[0].count, 1);
}

// ─── Health ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn ping_round_trips() {
  let s = store().await;
  s.ping().await.unwrap();
}
