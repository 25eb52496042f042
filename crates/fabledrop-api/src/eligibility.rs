//! Handler for `GET /eligibility` — the read-only quota view.
//!
//! The view is advisory: placement itself re-checks everything, and the
//! store enforces the one-per-cycle rule again at write time.

use axum::{Json, extract::State, http::HeaderMap};
use chrono::{DateTime, Utc};
use fabledrop_core::{
  catalog::BookCatalog,
  eligibility::{check_order, cycle_index, next_eligible_date, orders_for_cycle},
  identity::IdentityProvider,
  store::SubscriptionStore,
};
use serde::Serialize;

use crate::{AppState, auth::authenticate, error::ApiError};

#[derive(Debug, Serialize)]
pub struct EligibilityView {
  pub can_order:          bool,
  /// Machine-readable rejection code when `can_order` is false.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub reason:             Option<&'static str>,
  /// Current billing-cycle index; absent without a subscription.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub cycle:              Option<i32>,
  pub orders_this_cycle:  usize,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub months_remaining:   Option<i32>,
  /// Conservative — see [`next_eligible_date`].
  #[serde(skip_serializing_if = "Option::is_none")]
  pub next_eligible_date: Option<DateTime<Utc>>,
}

/// `GET /eligibility`
pub async fn status<S, C, I>(
  State(state): State<AppState<S, C, I>>,
  headers: HeaderMap,
) -> Result<Json<EligibilityView>, ApiError>
where
  S: SubscriptionStore,
  C: BookCatalog,
  I: IdentityProvider,
{
  let profile = authenticate(state.identity.as_ref(), &headers).await?;

  let subscription = state
    .store
    .get_subscription(&profile.email)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let orders = state
    .store
    .get_orders(&profile.email)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let now = Utc::now();
  let outcome = check_order(subscription.as_ref(), &orders, now);
  let cycle = subscription.as_ref().map(|s| cycle_index(s.start_date, now));

  Ok(Json(EligibilityView {
    can_order: outcome.is_ok(),
    reason: outcome.err().map(|e| e.code()),
    cycle,
    orders_this_cycle: cycle
      .map(|c| orders_for_cycle(&orders, c).len())
      .unwrap_or(0),
    months_remaining: subscription.as_ref().map(|s| s.months_remaining),
    next_eligible_date: next_eligible_date(subscription.as_ref(), &orders, now),
  }))
}
