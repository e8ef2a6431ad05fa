//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as `YYYY-MM-DD`
//! (which keeps lexicographic and chronological order identical), UUIDs as
//! hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, Utc};
use orbit_core::{
  group::Group,
  interaction::Interaction,
  person::{Person, PersonSource},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(e.to_string()))
}

// ─── NaiveDate ────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::Decode(e.to_string()))
}

// ─── PersonSource ─────────────────────────────────────────────────────────────

pub fn encode_source(s: PersonSource) -> &'static str {
  match s {
    PersonSource::Manual => "manual",
    PersonSource::Contacts => "contacts",
  }
}

pub fn decode_source(s: &str) -> Result<PersonSource> {
  match s {
    "manual" => Ok(PersonSource::Manual),
    "contacts" => Ok(PersonSource::Contacts),
    other => Err(Error::Decode(format!("unknown person source: {other:?}"))),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `person` row.
pub struct RawPerson {
  pub id:         String,
  pub name:       String,
  pub context:    Option<String>,
  pub source:     String,
  pub created_at: String,
}

impl RawPerson {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      name:       row.get(1)?,
      context:    row.get(2)?,
      source:     row.get(3)?,
      created_at: row.get(4)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id:         decode_uuid(&self.id)?,
      name:       self.name,
      context:    self.context,
      source:     decode_source(&self.source)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `group_context` row.
pub struct RawGroup {
  pub group_id:   String,
  pub group_name: String,
  pub color:      String,
}

impl RawGroup {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      group_id:   row.get(0)?,
      group_name: row.get(1)?,
      color:      row.get(2)?,
    })
  }

  pub fn into_group(self) -> Result<Group> {
    Ok(Group {
      group_id:   decode_uuid(&self.group_id)?,
      group_name: self.group_name,
      color:      self.color,
    })
  }
}

/// Raw strings read directly from an `interaction` row.
pub struct RawInteraction {
  pub id:         String,
  pub date:       String,
  pub created_at: String,
}

impl RawInteraction {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      date:       row.get(1)?,
      created_at: row.get(2)?,
    })
  }

  pub fn into_interaction(self) -> Result<Interaction> {
    Ok(Interaction {
      id:         decode_uuid(&self.id)?,
      date:       decode_date(&self.date)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
