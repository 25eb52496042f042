//! Subscription — the per-user plan record the eligibility rules read.
//!
//! A subscription is created once by the "activate subscription" action and
//! afterwards mutated only by order acceptance, which returns a new value
//! with `months_remaining` decremented. The engine reads `status` but never
//! writes it; status transitions are driven externally.

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Plan length in calendar months. Also the initial `months_remaining`.
pub const PLAN_LENGTH_MONTHS: i32 = 6;

/// Subscription lifecycle state. `Cancelled` is terminal; `Inactive` may
/// return to `Active`. Transitions are external to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
  Active,
  Inactive,
  Cancelled,
}

/// Free-form selection hints. Opaque to the eligibility rules; the catalog
/// surface uses them to bias curated picks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
  #[serde(default)]
  pub genres:  Vec<String>,
  #[serde(default)]
  pub authors: Vec<String>,
  #[serde(default)]
  pub themes:  Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
  pub id:               Uuid,
  /// Owner key — the subscriber's email address.
  pub user_id:          String,
  pub status:           SubscriptionStatus,
  /// Cycle-0 anchor; cycle 1 begins here.
  pub start_date:       DateTime<Utc>,
  /// Informational only; the engine never enforces it.
  pub end_date:         DateTime<Utc>,
  /// Decremented by one on each accepted order. No floor is applied at the
  /// decrement; eligibility requires it to be positive beforehand.
  pub months_remaining: i32,
  pub preferences:      Preferences,
  pub gift_message:     Option<String>,
}

impl Subscription {
  /// Activate a new plan for `user_id`, anchored at `now`.
  pub fn new(
    user_id: impl Into<String>,
    preferences: Preferences,
    gift_message: Option<String>,
    now: DateTime<Utc>,
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      user_id: user_id.into(),
      status: SubscriptionStatus::Active,
      start_date: now,
      // Clamps to the last day of the target month when the start day does
      // not exist there (e.g. Aug 31 → Feb 28).
      end_date: now
        .checked_add_months(Months::new(PLAN_LENGTH_MONTHS as u32))
        .unwrap_or(now),
      months_remaining: PLAN_LENGTH_MONTHS,
      preferences,
      gift_message,
    }
  }

  pub fn is_active(&self) -> bool {
    self.status == SubscriptionStatus::Active
  }
}
