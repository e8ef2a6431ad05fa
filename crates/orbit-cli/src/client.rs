//! Async HTTP client wrapping the Orbit JSON API.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use orbit_core::{group::Group, interaction::Interaction, person::Person, stats::Stats};
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;

/// Connection settings for the Orbit API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the Orbit JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  // ── People ────────────────────────────────────────────────────────────────

  /// `GET /api/people`
  pub async fn list_people(&self) -> Result<Vec<Person>> {
    let resp = self
      .client
      .get(self.url("/people"))
      .send()
      .await
      .context("GET /people failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET /people → {}", resp.status()));
    }
    resp.json().await.context("deserialising people")
  }

  /// `POST /api/people`
  pub async fn add_person(
    &self,
    name: &str,
    context: Option<&str>,
    source: &str,
  ) -> Result<Person> {
    let resp = self
      .client
      .post(self.url("/people"))
      .json(&json!({ "name": name, "context": context, "source": source }))
      .send()
      .await
      .context("POST /people failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("POST /people → {}", resp.status()));
    }
    resp.json().await.context("deserialising person")
  }

  /// `DELETE /api/people/:id`
  pub async fn remove_person(&self, id: Uuid) -> Result<()> {
    let resp = self
      .client
      .delete(self.url(&format!("/people/{id}")))
      .send()
      .await
      .context("DELETE /people failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("DELETE /people/{id} → {}", resp.status()));
    }
    Ok(())
  }

  // ── Interactions ──────────────────────────────────────────────────────────

  /// `POST /api/interactions`
  pub async fn record(&self, date: NaiveDate, person_ids: &[Uuid]) -> Result<Interaction> {
    let resp = self
      .client
      .post(self.url("/interactions"))
      .json(&json!({ "date": date, "personIds": person_ids }))
      .send()
      .await
      .context("POST /interactions failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("POST /interactions → {}", resp.status()));
    }
    resp.json().await.context("deserialising interaction")
  }

  /// `GET /api/interactions/:date/people`
  pub async fn day_people(&self, date: NaiveDate) -> Result<Vec<Person>> {
    let resp = self
      .client
      .get(self.url(&format!("/interactions/{date}/people")))
      .send()
      .await
      .context("GET /interactions/:date/people failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET /interactions/{date}/people → {}", resp.status()));
    }
    resp.json().await.context("deserialising people")
  }

  /// `DELETE /api/interactions/:date/people/:person_id`
  pub async fn undo(&self, date: NaiveDate, person_id: Uuid) -> Result<()> {
    let resp = self
      .client
      .delete(self.url(&format!("/interactions/{date}/people/{person_id}")))
      .send()
      .await
      .context("DELETE /interactions/:date/people/:id failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!(
        "DELETE /interactions/{date}/people/{person_id} → {}",
        resp.status()
      ));
    }
    Ok(())
  }

  // ── Stats ─────────────────────────────────────────────────────────────────

  /// `GET /api/stats?filter=...&period=...`
  pub async fn stats(&self, filter: &str, period: &str) -> Result<Stats> {
    let resp = self
      .client
      .get(self.url("/stats"))
      .query(&[("filter", filter), ("period", period)])
      .send()
      .await
      .context("GET /stats failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET /stats → {}", resp.status()));
    }
    resp.json().await.context("deserialising stats")
  }

  // ── Groups ────────────────────────────────────────────────────────────────

  /// `GET /api/groups`
  pub async fn list_groups(&self) -> Result<Vec<Group>> {
    let resp = self
      .client
      .get(self.url("/groups"))
      .send()
      .await
      .context("GET /groups failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET /groups → {}", resp.status()));
    }
    resp.json().await.context("deserialising groups")
  }

  /// `POST /api/groups`
  pub async fn add_group(&self, name: &str, color: Option<&str>) -> Result<Group> {
    let resp = self
      .client
      .post(self.url("/groups"))
      .json(&json!({ "group_name": name, "color": color }))
      .send()
      .await
      .context("POST /groups failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("POST /groups → {}", resp.status()));
    }
    resp.json().await.context("deserialising group")
  }

  /// `DELETE /api/groups/:id`
  pub async fn remove_group(&self, id: Uuid) -> Result<()> {
    let resp = self
      .client
      .delete(self.url(&format!("/groups/{id}")))
      .send()
      .await
      .context("DELETE /groups failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("DELETE /groups/{id} → {}", resp.status()));
    }
    Ok(())
  }
}
