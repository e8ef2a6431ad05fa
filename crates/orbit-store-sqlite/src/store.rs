//! [`SqliteStore`] — the SQLite implementation of [`RelationStore`].

use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use orbit_core::{
  group::{Group, GroupPatch, NewGroup},
  interaction::Interaction,
  person::{NewPerson, Person, PersonPatch},
  stats::{DayCount, RangeFilter, Stats, TopPerson, TOP_LIMIT},
  store::RelationStore,
};

use crate::{
  encode::{
    decode_date, decode_uuid, encode_date, encode_dt, encode_source,
    encode_uuid, RawGroup, RawInteraction, RawPerson,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Orbit relation store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── RelationStore impl ──────────────────────────────────────────────────────

impl RelationStore for SqliteStore {
  type Error = Error;

  // ── People ────────────────────────────────────────────────────────────────

  async fn add_person(&self, input: NewPerson) -> Result<Person> {
    let person = Person {
      id:         Uuid::new_v4(),
      name:       input.name,
      context:    input.context,
      source:     input.source,
      created_at: Utc::now(),
    };

    let id_str     = encode_uuid(person.id);
    let name       = person.name.clone();
    let context    = person.context.clone();
    let source_str = encode_source(person.source).to_owned();
    let at_str     = encode_dt(person.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO person (id, name, context, source, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, name, context, source_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(person)
  }

  async fn get_person(&self, id: Uuid) -> Result<Option<Person>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, name, context, source, created_at FROM person WHERE id = ?1",
            rusqlite::params![id_str],
            RawPerson::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn list_people(&self) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, name, context, source, created_at FROM person ORDER BY name ASC",
        )?;
        let rows = stmt
          .query_map([], RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn update_person(&self, id: Uuid, patch: PersonPatch) -> Result<Option<Person>> {
    if patch.is_empty() {
      return self.get_person(id).await;
    }

    let id_str = encode_uuid(id);

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        let mut sets: Vec<&'static str> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(name) = patch.name {
          sets.push("name = ?");
          values.push(Box::new(name));
        }
        if let Some(context) = patch.context {
          sets.push("context = ?");
          values.push(Box::new(context));
        }
        if let Some(source) = patch.source {
          sets.push("source = ?");
          values.push(Box::new(encode_source(source).to_owned()));
        }
        values.push(Box::new(id_str.clone()));

        let sql = format!("UPDATE person SET {} WHERE id = ?", sets.join(", "));
        let updated = conn.execute(&sql, rusqlite::params_from_iter(values))?;
        if updated == 0 {
          return Ok(None);
        }

        Ok(
          conn
            .query_row(
              "SELECT id, name, context, source, created_at FROM person WHERE id = ?1",
              rusqlite::params![id_str],
              RawPerson::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn delete_person(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM person WHERE id = ?1", rusqlite::params![id_str])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Groups ────────────────────────────────────────────────────────────────

  async fn add_group(&self, input: NewGroup) -> Result<Group> {
    let group = Group {
      group_id:   Uuid::new_v4(),
      group_name: input.group_name,
      color:      input.color,
    };

    let id_str = encode_uuid(group.group_id);
    let name   = group.group_name.clone();
    let color  = group.color.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO group_context (group_id, group_name, color) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, name, color],
        )?;
        Ok(())
      })
      .await?;

    Ok(group)
  }

  async fn get_group(&self, id: Uuid) -> Result<Option<Group>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawGroup> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT group_id, group_name, color FROM group_context WHERE group_id = ?1",
            rusqlite::params![id_str],
            RawGroup::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawGroup::into_group).transpose()
  }

  async fn group_by_name(&self, name: &str) -> Result<Option<Group>> {
    let name = name.to_owned();

    // group_name carries COLLATE NOCASE, so the comparison is
    // case-insensitive without spelling it out here.
    let raw: Option<RawGroup> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT group_id, group_name, color FROM group_context WHERE group_name = ?1",
            rusqlite::params![name],
            RawGroup::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawGroup::into_group).transpose()
  }

  async fn list_groups(&self) -> Result<Vec<Group>> {
    let raws: Vec<RawGroup> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT group_id, group_name, color FROM group_context ORDER BY group_name ASC",
        )?;
        let rows = stmt
          .query_map([], RawGroup::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawGroup::into_group).collect()
  }

  async fn update_group(&self, id: Uuid, patch: GroupPatch) -> Result<Option<Group>> {
    if patch.is_empty() {
      return self.get_group(id).await;
    }

    let id_str = encode_uuid(id);

    let raw: Option<RawGroup> = self
      .conn
      .call(move |conn| {
        let mut sets: Vec<&'static str> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(name) = patch.group_name {
          sets.push("group_name = ?");
          values.push(Box::new(name));
        }
        if let Some(color) = patch.color {
          sets.push("color = ?");
          values.push(Box::new(color));
        }
        values.push(Box::new(id_str.clone()));

        let sql = format!("UPDATE group_context SET {} WHERE group_id = ?", sets.join(", "));
        let updated = conn.execute(&sql, rusqlite::params_from_iter(values))?;
        if updated == 0 {
          return Ok(None);
        }

        Ok(
          conn
            .query_row(
              "SELECT group_id, group_name, color FROM group_context WHERE group_id = ?1",
              rusqlite::params![id_str],
              RawGroup::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawGroup::into_group).transpose()
  }

  async fn delete_group(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM group_context WHERE group_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Interaction recording ─────────────────────────────────────────────────

  async fn record_interaction(
    &self,
    date: NaiveDate,
    person_ids: Vec<Uuid>,
  ) -> Result<Interaction> {
    let new_id_str  = encode_uuid(Uuid::new_v4());
    let date_str    = encode_date(date);
    let at_str      = encode_dt(Utc::now());
    let person_strs: Vec<String> = person_ids.into_iter().map(encode_uuid).collect();

    let raw: RawInteraction = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // First-insert-wins: a concurrent recorder for the same date leaves
        // the existing row in place and this insert is a no-op.
        tx.execute(
          "INSERT INTO interaction (id, date, created_at) VALUES (?1, ?2, ?3)
           ON CONFLICT(date) DO NOTHING",
          rusqlite::params![new_id_str, date_str, at_str],
        )?;

        let raw = tx.query_row(
          "SELECT id, date, created_at FROM interaction WHERE date = ?1",
          rusqlite::params![date_str],
          RawInteraction::from_row,
        )?;

        for person_str in &person_strs {
          tx.execute(
            "INSERT INTO interaction_person (interaction_id, person_id)
             VALUES (?1, ?2)
             ON CONFLICT(interaction_id, person_id) DO NOTHING",
            rusqlite::params![raw.id, person_str],
          )?;
        }

        // Any error above drops `tx`, rolling the whole call back — the day
        // row and partial memberships are never left behind.
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.into_interaction()
  }

  async fn interaction_for_date(&self, date: NaiveDate) -> Result<Option<Interaction>> {
    let date_str = encode_date(date);

    let raw: Option<RawInteraction> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, date, created_at FROM interaction WHERE date = ?1",
            rusqlite::params![date_str],
            RawInteraction::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawInteraction::into_interaction).transpose()
  }

  async fn list_interactions(&self) -> Result<Vec<Interaction>> {
    let raws: Vec<RawInteraction> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, date, created_at FROM interaction ORDER BY date DESC",
        )?;
        let rows = stmt
          .query_map([], RawInteraction::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawInteraction::into_interaction)
      .collect()
  }

  async fn delete_interaction(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM interaction WHERE id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn people_for_interaction(&self, interaction_id: Uuid) -> Result<Vec<Person>> {
    let id_str = encode_uuid(interaction_id);

    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT p.id, p.name, p.context, p.source, p.created_at
           FROM interaction_person ip
           JOIN person p ON p.id = ip.person_id
           WHERE ip.interaction_id = ?1
           ORDER BY p.name ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn remove_person(&self, interaction_id: Uuid, person_id: Uuid) -> Result<()> {
    let interaction_str = encode_uuid(interaction_id);
    let person_str      = encode_uuid(person_id);

    // Deleting an absent membership row is the designed no-op path.
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM interaction_person WHERE interaction_id = ?1 AND person_id = ?2",
          rusqlite::params![interaction_str, person_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Aggregation ───────────────────────────────────────────────────────────

  async fn compute_stats(&self, range: RangeFilter) -> Result<Stats> {
    let bounds = range
      .bounds()
      .map(|(start, end)| (encode_date(start), encode_date(end)));

    type DayRow = (String, i64);
    type TopRow = (String, String, i64);

    let (day_rows, top_rows): (Vec<DayRow>, Vec<TopRow>) = self
      .conn
      .call(move |conn| {
        let (day_rows, top_rows) = if let Some((start, end)) = bounds {
          let mut stmt = conn.prepare(
            "SELECT i.date, COUNT(ip.person_id) AS count
             FROM interaction i
             JOIN interaction_person ip ON ip.interaction_id = i.id
             WHERE i.date >= ?1 AND i.date < ?2
             GROUP BY i.date
             ORDER BY i.date DESC",
          )?;
          let days = stmt
            .query_map(rusqlite::params![start, end], |row| {
              Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<rusqlite::Result<Vec<DayRow>>>()?;

          let mut stmt = conn.prepare(
            "SELECT p.id, p.name, COUNT(*) AS count
             FROM interaction_person ip
             JOIN interaction i ON i.id = ip.interaction_id
             JOIN person p ON p.id = ip.person_id
             WHERE i.date >= ?1 AND i.date < ?2
             GROUP BY p.id, p.name
             ORDER BY count DESC, p.name ASC
             LIMIT ?3",
          )?;
          let top = stmt
            .query_map(rusqlite::params![start, end, TOP_LIMIT], |row| {
              Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })?
            .collect::<rusqlite::Result<Vec<TopRow>>>()?;

          (days, top)
        } else {
          let mut stmt = conn.prepare(
            "SELECT i.date, COUNT(ip.person_id) AS count
             FROM interaction i
             JOIN interaction_person ip ON ip.interaction_id = i.id
             GROUP BY i.date
             ORDER BY i.date DESC",
          )?;
          let days = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<DayRow>>>()?;

          let mut stmt = conn.prepare(
            "SELECT p.id, p.name, COUNT(*) AS count
             FROM interaction_person ip
             JOIN interaction i ON i.id = ip.interaction_id
             JOIN person p ON p.id = ip.person_id
             GROUP BY p.id, p.name
             ORDER BY count DESC, p.name ASC
             LIMIT ?1",
          )?;
          let top = stmt
            .query_map(rusqlite::params![TOP_LIMIT], |row| {
              Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })?
            .collect::<rusqlite::Result<Vec<TopRow>>>()?;

          (days, top)
        };

        Ok((day_rows, top_rows))
      })
      .await?;

    let per_day = day_rows
      .into_iter()
      .map(|(date, count)| Ok(DayCount { date: decode_date(&date)?, count }))
      .collect::<Result<Vec<_>>>()?;

    let top = top_rows
      .into_iter()
      .map(|(id, name, count)| {
        Ok(TopPerson { person_id: decode_uuid(&id)?, name, count })
      })
      .collect::<Result<Vec<_>>>()?;

    Ok(Stats { per_day, top })
  }

  // ── Health ────────────────────────────────────────────────────────────────

  async fn ping(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
