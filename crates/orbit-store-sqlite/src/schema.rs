//! SQL schema for the Orbit SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS group_context (
    group_id    TEXT PRIMARY KEY,
    group_name  TEXT NOT NULL COLLATE NOCASE UNIQUE,
    color       TEXT NOT NULL DEFAULT '#9e9e9e'
);

-- `context` is a real reference to a group name. Renames cascade into every
-- person carrying the name; deleting the group clears it to NULL.
CREATE TABLE IF NOT EXISTS person (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    context     TEXT REFERENCES group_context(group_name)
                     ON DELETE SET NULL
                     ON UPDATE CASCADE,
    source      TEXT NOT NULL,   -- 'manual' | 'contacts'
    created_at  TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

-- At most one interaction-day per calendar date.
CREATE TABLE IF NOT EXISTS interaction (
    id          TEXT PRIMARY KEY,
    date        TEXT NOT NULL UNIQUE,   -- YYYY-MM-DD
    created_at  TEXT NOT NULL
);

-- Membership: this person was part of this day's interaction set.
CREATE TABLE IF NOT EXISTS interaction_person (
    interaction_id TEXT NOT NULL REFERENCES interaction(id) ON DELETE CASCADE,
    person_id      TEXT NOT NULL REFERENCES person(id)      ON DELETE CASCADE,
    PRIMARY KEY (interaction_id, person_id)
);

CREATE INDEX IF NOT EXISTS person_name_idx       ON person(name);
CREATE INDEX IF NOT EXISTS membership_person_idx ON interaction_person(person_id);

PRAGMA user_version = 1;
";
