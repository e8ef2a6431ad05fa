//! Aggregation types and the `all | year | month` range filter.
//!
//! Both aggregate queries run over the same `[start, end)` date window. A
//! malformed period is documented policy, not an error: it behaves exactly
//! like no filter at all.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Hard cap on the length of the `top` ranking.
pub const TOP_LIMIT: i64 = 10;

// ─── Range filter ─────────────────────────────────────────────────────────────

/// The date bound applied to aggregation queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeFilter {
  /// No date bound.
  All,
  /// The calendar year `[Y-01-01, (Y+1)-01-01)`.
  Year(i32),
  /// The calendar month `[Y-M-01, next-month-01)`; December rolls the year
  /// forward.
  Month { year: i32, month: u32 },
}

impl RangeFilter {
  /// Parse the `filter`/`period` query parameters from the access surface.
  ///
  /// `filter=year` requires `period` to be exactly four ASCII digits;
  /// `filter=month` requires `YYYY-MM` with a month in `01..=12`. Any other
  /// combination — including an impossible month such as `2024-13` — falls
  /// back to [`RangeFilter::All`].
  pub fn from_params(filter: &str, period: &str) -> Self {
    match filter {
      "year" => match parse_year(period) {
        Some(y) => Self::Year(y),
        None => Self::All,
      },
      "month" => match parse_month(period) {
        Some((year, month)) => Self::Month { year, month },
        None => Self::All,
      },
      _ => Self::All,
    }
  }

  /// The `[start, end)` window this filter restricts to; `None` means
  /// unbounded.
  pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
    match *self {
      Self::All => None,
      Self::Year(y) => {
        let start = NaiveDate::from_ymd_opt(y, 1, 1)?;
        let end = NaiveDate::from_ymd_opt(y + 1, 1, 1)?;
        Some((start, end))
      }
      Self::Month { year, month } => {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let (end_year, end_month) = if month == 12 {
          (year + 1, 1)
        } else {
          (year, month + 1)
        };
        let end = NaiveDate::from_ymd_opt(end_year, end_month, 1)?;
        Some((start, end))
      }
    }
  }
}

fn parse_year(s: &str) -> Option<i32> {
  if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  s.parse().ok()
}

fn parse_month(s: &str) -> Option<(i32, u32)> {
  let (y, m) = s.split_once('-')?;
  if y.len() != 4 || m.len() != 2 {
    return None;
  }
  if !y.bytes().all(|b| b.is_ascii_digit()) || !m.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  let month: u32 = m.parse().ok()?;
  if !(1..=12).contains(&month) {
    return None;
  }
  Some((y.parse().ok()?, month))
}

// ─── Aggregate results ────────────────────────────────────────────────────────

/// One point of the per-day interaction-count time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCount {
  pub date:  NaiveDate,
  pub count: i64,
}

/// One row of the most-frequently-seen ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopPerson {
  pub person_id: Uuid,
  pub name:      String,
  pub count:     i64,
}

/// Result of [`crate::store::RelationStore::compute_stats`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
  /// Dates with at least one member, newest first.
  pub per_day: Vec<DayCount>,
  /// People by interaction count (desc), name (asc); at most [`TOP_LIMIT`].
  pub top:     Vec<TopPerson>,
}

// ─── Tests ────────────────────────────────────────────────────────────────────
