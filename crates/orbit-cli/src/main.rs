//! `orbit` — command-line client for the Orbit relationship tracker.
//!
//! # Usage
//!
//! ```
//! orbit people list
//! orbit people add "Alice" --context friends
//! orbit record 2024-05-01 Alice Bob
//! orbit day 2024-05-01
//! orbit undo 2024-05-01 Bob
//! orbit stats --filter year --period 2024
//! ```

mod client;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use serde::Deserialize;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "orbit", about = "Command-line client for the Orbit relationship tracker")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the Orbit server (default: http://localhost:3001).
  #[arg(long, env = "ORBIT_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Manage people.
  People {
    #[command(subcommand)]
    action: PeopleAction,
  },
  /// Manage groups.
  Groups {
    #[command(subcommand)]
    action: GroupsAction,
  },
  /// Record who you interacted with on a date. People are given by name or
  /// UUID.
  Record {
    date:   NaiveDate,
    people: Vec<String>,
  },
  /// Show who was part of a date's interaction set.
  Day { date: NaiveDate },
  /// Detach one person (by name or UUID) from one date.
  Undo {
    date:   NaiveDate,
    person: String,
  },
  /// Aggregate statistics.
  Stats {
    /// all | year | month
    #[arg(long, default_value = "all")]
    filter: String,
    /// YYYY for year, YYYY-MM for month.
    #[arg(long, default_value = "")]
    period: String,
  },
}

#[derive(Subcommand, Debug)]
enum PeopleAction {
  /// List everyone, name ascending.
  List,
  /// Add a person.
  Add {
    name: String,
    /// Group name to attach as context.
    #[arg(long)]
    context: Option<String>,
    /// manual | contacts
    #[arg(long, default_value = "manual")]
    source: String,
  },
  /// Remove a person (by name or UUID).
  Rm { person: String },
}

#[derive(Subcommand, Debug)]
enum GroupsAction {
  /// List all groups, name ascending.
  List,
  /// Add a group.
  Add {
    name: String,
    /// Display color, e.g. `#ff7043`.
    #[arg(long)]
    color: Option<String>,
  },
  /// Remove a group by name.
  Rm { name: String },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:3001".to_string()),
  };

  let client = ApiClient::new(api_config)?;

  match args.command {
    Command::People { action } => match action {
      PeopleAction::List => {
        for p in client.list_people().await? {
          let context = p.context.as_deref().unwrap_or("-");
          println!("{}  {:<24} {:<16} {}", p.id, p.name, context, source_str(p.source));
        }
      }
      PeopleAction::Add { name, context, source } => {
        let person = client
          .add_person(&name, context.as_deref(), &source)
          .await?;
        println!("{}  {}", person.id, person.name);
      }
      PeopleAction::Rm { person } => {
        let id = resolve_person(&client, &person).await?;
        client.remove_person(id).await?;
      }
    },

    Command::Groups { action } => match action {
      GroupsAction::List => {
        for g in client.list_groups().await? {
          println!("{}  {:<24} {}", g.group_id, g.group_name, g.color);
        }
      }
      GroupsAction::Add { name, color } => {
        let group = client.add_group(&name, color.as_deref()).await?;
        println!("{}  {}", group.group_id, group.group_name);
      }
      GroupsAction::Rm { name } => {
        let group = client
          .list_groups()
          .await?
          .into_iter()
          .find(|g| g.group_name.eq_ignore_ascii_case(&name))
          .ok_or_else(|| anyhow!("no group named {name:?}"))?;
        client.remove_group(group.group_id).await?;
      }
    },

    Command::Record { date, people } => {
      let mut ids = Vec::with_capacity(people.len());
      for person in &people {
        ids.push(resolve_person(&client, person).await?);
      }
      let interaction = client.record(date, &ids).await?;
      println!("{}  {} ({} added)", interaction.id, interaction.date, ids.len());
    }

    Command::Day { date } => {
      for p in client.day_people(date).await? {
        println!("{}  {}", p.id, p.name);
      }
    }

    Command::Undo { date, person } => {
      let id = resolve_person(&client, &person).await?;
      client.undo(date, id).await?;
    }

    Command::Stats { filter, period } => {
      let stats = client.stats(&filter, &period).await?;
      if !stats.top.is_empty() {
        println!("top:");
        for t in &stats.top {
          println!("  {:<24} {}", t.name, t.count);
        }
      }
      if !stats.per_day.is_empty() {
        println!("per day:");
        for d in &stats.per_day {
          println!("  {}  {}", d.date, d.count);
        }
      }
    }
  }

  Ok(())
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn source_str(source: orbit_core::person::PersonSource) -> &'static str {
  match source {
    orbit_core::person::PersonSource::Manual => "manual",
    orbit_core::person::PersonSource::Contacts => "contacts",
  }
}

/// Resolve a CLI person argument: a UUID is taken as-is, anything else is
/// matched against person names, case-insensitively.
async fn resolve_person(client: &ApiClient, arg: &str) -> Result<Uuid> {
  if let Ok(id) = Uuid::parse_str(arg) {
    return Ok(id);
  }

  let matches: Vec<_> = client
    .list_people()
    .await?
    .into_iter()
    .filter(|p| p.name.eq_ignore_ascii_case(arg))
    .collect();

  match matches.as_slice() {
    [] => Err(anyhow!("no person named {arg:?}")),
    [p] => Ok(p.id),
    many => Err(anyhow!(
      "{arg:?} is ambiguous — {} people share that name; use a UUID",
      many.len()
    )),
  }
}
