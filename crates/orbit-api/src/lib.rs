//! JSON REST API for Orbit.
//!
//! Exposes an axum [`Router`] backed by any
//! [`orbit_core::store::RelationStore`]. Transport concerns (TLS, CORS) are
//! the caller's responsibility — the `server` binary applies a permissive
//! CORS layer for the browser UI.

pub mod error;
pub mod groups;
pub mod health;
pub mod interactions;
pub mod people;
pub mod stats;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get, put},
};
use orbit_core::store::RelationStore;
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` merged with
/// `ORBIT_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 3001 }

fn default_store_path() -> PathBuf { PathBuf::from("orbit.db") }

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RelationStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/health", get(health::handler::<S>))
    // People
    .route("/api/people", get(people::list::<S>).post(people::create::<S>))
    .route(
      "/api/people/{id}",
      put(people::update::<S>).delete(people::delete_one::<S>),
    )
    // Interactions
    .route(
      "/api/interactions",
      get(interactions::list::<S>).post(interactions::record::<S>),
    )
    .route(
      "/api/interactions/{date}",
      delete(interactions::delete_day::<S>),
    )
    .route(
      "/api/interactions/{date}/people",
      get(interactions::day_people::<S>),
    )
    .route(
      "/api/interactions/{date}/people/{person_id}",
      delete(interactions::undo::<S>),
    )
    // Stats
    .route("/api/stats", get(stats::handler::<S>))
    // Groups
    .route("/api/groups", get(groups::list::<S>).post(groups::create::<S>))
    .route(
      "/api/groups/{id}",
      put(groups::update::<S>).delete(groups::delete_one::<S>),
    )
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
