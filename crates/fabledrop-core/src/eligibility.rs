//! The subscription order eligibility rules.
//!
//! Cycle indexing, the per-cycle and lifetime quotas, and the guarded
//! construction of a new order. Every function here is pure: wall-clock time
//! is an explicit argument and nothing is read from or written to the
//! outside world. Persisting an accepted order is the store's job (see
//! [`crate::store::SubscriptionStore::commit_order`]).

use chrono::{DateTime, Datelike, TimeZone, Utc};
use uuid::Uuid;

use crate::{
  Error, Result,
  book::Book,
  order::{DeliveryStatus, Order, OrderStatus, ShippingAddress},
  subscription::Subscription,
};

/// Hard maximum of orders ever permitted under one subscription.
///
/// Kept as its own check, independent of `months_remaining`: the two start
/// equal (both derive from the six-month plan) but nothing forces them to
/// stay in lockstep, and each produces its own rejection reason.
pub const LIFETIME_ORDER_CAP: usize = 6;

// ─── Cycle indexing ──────────────────────────────────────────────────────────

/// The billing-cycle index of a subscription started at `start`, evaluated
/// at `at`. Pure calendar-month arithmetic over UTC month numbers:
/// `cycle(start) == 1`, and a subscription started on the 31st rolls into
/// cycle 2 on the 1st of the following month regardless of elapsed days.
pub fn cycle_index(start: DateTime<Utc>, at: DateTime<Utc>) -> i32 {
  (at.year() - start.year()) * 12 + (at.month() as i32 - start.month() as i32) + 1
}

/// The orders placed in `cycle`, in store insertion order. May be empty.
pub fn orders_for_cycle(orders: &[Order], cycle: i32) -> Vec<&Order> {
  orders.iter().filter(|o| o.month == cycle).collect()
}

// ─── Eligibility ─────────────────────────────────────────────────────────────

/// Why a new order would be rejected right now, or `Ok` if one may be
/// placed. Total over its inputs; read-only.
///
/// Checks run in a fixed order, so when several rules would fire the caller
/// sees the first: missing/non-active subscription, exhausted
/// `months_remaining`, the lifetime cap, then the one-per-cycle rule.
pub fn check_order(
  subscription: Option<&Subscription>,
  orders: &[Order],
  now: DateTime<Utc>,
) -> Result<()> {
  let Some(sub) = subscription else {
    return Err(Error::NoActiveSubscription);
  };
  if !sub.is_active() {
    return Err(Error::NoActiveSubscription);
  }
  if sub.months_remaining <= 0 {
    return Err(Error::QuotaExhausted);
  }
  if orders.len() >= LIFETIME_ORDER_CAP {
    return Err(Error::LifetimeCapReached);
  }
  let cycle = cycle_index(sub.start_date, now);
  if !orders_for_cycle(orders, cycle).is_empty() {
    return Err(Error::AlreadyOrderedThisCycle);
  }
  Ok(())
}

/// `true` iff [`check_order`] passes.
pub fn can_order(
  subscription: Option<&Subscription>,
  orders: &[Order],
  now: DateTime<Utc>,
) -> bool {
  check_order(subscription, orders, now).is_ok()
}

/// When the subscriber may next place an order.
///
/// `None` if there is no subscription or it is not active; `now` if an order
/// may be placed immediately; otherwise 00:00 UTC on the first day of the
/// month after `now`. The rollover date is a conservative upper bound only —
/// when the blocker is the lifetime cap or the quota, no future order will
/// ever be possible, so callers must re-check [`can_order`] rather than
/// treat the date as a promise.
pub fn next_eligible_date(
  subscription: Option<&Subscription>,
  orders: &[Order],
  now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
  let sub = subscription?;
  if !sub.is_active() {
    return None;
  }
  if check_order(Some(sub), orders, now).is_ok() {
    return Some(now);
  }
  next_month_start(now)
}

/// 00:00 UTC on the first day of the month after `at`.
fn next_month_start(at: DateTime<Utc>) -> Option<DateTime<Utc>> {
  let (year, month) = if at.month() == 12 {
    (at.year() + 1, 1)
  } else {
    (at.year(), at.month() + 1)
  };
  Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single()
}

// ─── Acceptance ──────────────────────────────────────────────────────────────

/// The outcome of a successful [`accept_order`] call: the order to append
/// and the subscription value to store. Both must be persisted together or
/// the acceptance is considered not to have happened — no partial commit may
/// be visible to later eligibility checks.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OrderAccepted {
  pub order:        Order,
  pub subscription: Subscription,
}

/// Accept a new order against `subscription`, or reject it with the reason
/// [`check_order`] would give.
///
/// Inputs are not mutated. The returned order carries the cycle index at
/// `now` and the initial fulfilment state; the returned subscription has
/// `months_remaining` decremented by one, with no floor applied.
pub fn accept_order(
  subscription: Option<&Subscription>,
  orders: &[Order],
  book: Book,
  personal_message: Option<String>,
  shipping_address: ShippingAddress,
  now: DateTime<Utc>,
) -> Result<OrderAccepted> {
  let Some(sub) = subscription else {
    return Err(Error::NoActiveSubscription);
  };
  check_order(Some(sub), orders, now)?;

  let order = Order {
    id: Uuid::new_v4(),
    user_id: sub.user_id.clone(),
    subscription_id: sub.id,
    book,
    order_date: now,
    month: cycle_index(sub.start_date, now),
    status: OrderStatus::Pending,
    delivery_status: DeliveryStatus::OrderPlaced,
    shipping_address,
    personal_message,
  };

  let subscription = Subscription {
    months_remaining: sub.months_remaining - 1,
    ..sub.clone()
  };

  Ok(OrderAccepted { order, subscription })
}
