//! Unit tests for the eligibility rules.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  Error,
  book::Book,
  eligibility::{
    LIFETIME_ORDER_CAP, accept_order, can_order, check_order, cycle_index,
    next_eligible_date, orders_for_cycle,
  },
  order::{DeliveryStatus, Order, OrderStatus, ShippingAddress},
  subscription::{
    PLAN_LENGTH_MONTHS, Preferences, Subscription, SubscriptionStatus,
  },
};

fn dt(s: &str) -> DateTime<Utc> {
  s.parse().expect("test timestamp")
}

fn book() -> Book {
  Book {
    id:             "vol_1".into(),
    title:          "The Night Circus".into(),
    author:         "Erin Morgenstern".into(),
    description:    "A duel between two young magicians.".into(),
    genre:          "fantasy".into(),
    isbn:           "978-0307744432".into(),
    cover_image:    "https://example.com/cover.jpg".into(),
    published_date: "2011-09-13".into(),
    page_count:     512,
    rating:         4.0,
  }
}

fn subscription(start: &str) -> Subscription {
  Subscription::new(
    "alice@example.com",
    Preferences::default(),
    None,
    dt(start),
  )
}

fn order_in_cycle(sub: &Subscription, cycle: i32) -> Order {
  Order {
    id:               Uuid::new_v4(),
    user_id:          sub.user_id.clone(),
    subscription_id:  sub.id,
    book:             book(),
    order_date:       sub.start_date,
    month:            cycle,
    status:           OrderStatus::Pending,
    delivery_status:  DeliveryStatus::OrderPlaced,
    shipping_address: ShippingAddress::default(),
    personal_message: None,
  }
}

// ─── Cycle indexing ──────────────────────────────────────────────────────────

#[test]
fn cycle_is_one_at_start() {
  let start = dt("2024-01-15T00:00:00Z");
  assert_eq!(cycle_index(start, start), 1);
  assert_eq!(cycle_index(start, dt("2024-01-20T09:30:00Z")), 1);
}

#[test]
fn cycle_rolls_on_calendar_month_not_elapsed_days() {
  let start = dt("2024-01-15T00:00:00Z");
  assert_eq!(cycle_index(start, dt("2024-02-01T00:00:00Z")), 2);

  // Started on the 31st: one day later is already the next cycle.
  let late_start = dt("2024-01-31T23:00:00Z");
  assert_eq!(cycle_index(late_start, dt("2024-02-01T01:00:00Z")), 2);
}

#[test]
fn cycle_counts_across_years() {
  let start = dt("2024-01-15T00:00:00Z");
  assert_eq!(cycle_index(start, dt("2025-01-15T00:00:00Z")), 13);
  assert_eq!(cycle_index(start, dt("2024-12-31T23:59:59Z")), 12);
}

#[test]
fn orders_for_cycle_filters_by_month() {
  let sub = subscription("2024-01-15T00:00:00Z");
  let orders = vec![
    order_in_cycle(&sub, 1),
    order_in_cycle(&sub, 2),
    order_in_cycle(&sub, 1),
  ];

  let first = orders_for_cycle(&orders, 1);
  assert_eq!(first.len(), 2);
  assert_eq!(first[0].id, orders[0].id);
  assert_eq!(first[1].id, orders[2].id);

  assert!(orders_for_cycle(&orders, 3).is_empty());
}

// ─── can_order / check_order ─────────────────────────────────────────────────

#[test]
fn happy_path_first_cycle() {
  let sub = subscription("2024-01-15T00:00:00Z");
  let now = dt("2024-01-20T12:00:00Z");

  assert!(can_order(Some(&sub), &[], now));

  let accepted = accept_order(
    Some(&sub),
    &[],
    book(),
    Some("enjoy!".into()),
    ShippingAddress::default(),
    now,
  )
  .unwrap();

  assert_eq!(accepted.order.month, 1);
  assert_eq!(accepted.order.status, OrderStatus::Pending);
  assert_eq!(accepted.order.delivery_status, DeliveryStatus::OrderPlaced);
  assert_eq!(accepted.order.subscription_id, sub.id);
  assert_eq!(accepted.order.order_date, now);
  assert_eq!(accepted.subscription.months_remaining, 5);

  // Inputs are untouched.
  assert_eq!(sub.months_remaining, PLAN_LENGTH_MONTHS);
}

#[test]
fn absent_subscription_is_rejected() {
  let now = dt("2024-01-20T12:00:00Z");
  assert_eq!(
    check_order(None, &[], now),
    Err(Error::NoActiveSubscription)
  );
  assert!(!can_order(None, &[], now));
}

#[test]
fn non_active_statuses_are_rejected() {
  let now = dt("2024-01-20T12:00:00Z");
  for status in [SubscriptionStatus::Inactive, SubscriptionStatus::Cancelled] {
    let mut sub = subscription("2024-01-15T00:00:00Z");
    sub.status = status;
    assert_eq!(
      check_order(Some(&sub), &[], now),
      Err(Error::NoActiveSubscription)
    );
  }
}

#[test]
fn exhausted_quota_is_rejected() {
  let mut sub = subscription("2024-01-15T00:00:00Z");
  sub.months_remaining = 0;
  let now = dt("2024-01-20T12:00:00Z");
  assert_eq!(check_order(Some(&sub), &[], now), Err(Error::QuotaExhausted));
}

#[test]
fn lifetime_cap_is_rejected_regardless_of_cycle_distribution() {
  let mut sub = subscription("2024-01-15T00:00:00Z");
  // Counter and cap can diverge; keep the counter positive so the cap is
  // what fires.
  sub.months_remaining = 3;
  let orders: Vec<Order> =
    (1..=LIFETIME_ORDER_CAP as i32).map(|c| order_in_cycle(&sub, c)).collect();
  let now = dt("2024-08-20T12:00:00Z");

  assert_eq!(
    check_order(Some(&sub), &orders, now),
    Err(Error::LifetimeCapReached)
  );
}

#[test]
fn one_order_per_cycle() {
  let sub = subscription("2024-01-15T00:00:00Z");
  let now = dt("2024-01-25T12:00:00Z");
  let orders = vec![order_in_cycle(&sub, cycle_index(sub.start_date, now))];

  assert_eq!(
    check_order(Some(&sub), &orders, now),
    Err(Error::AlreadyOrderedThisCycle)
  );

  // A month later the same history no longer blocks.
  let next_month = dt("2024-02-02T12:00:00Z");
  assert!(can_order(Some(&sub), &orders, next_month));
}

#[test]
fn predicates_are_idempotent() {
  let sub = subscription("2024-01-15T00:00:00Z");
  let orders = vec![order_in_cycle(&sub, 1)];
  let now = dt("2024-01-25T12:00:00Z");

  assert_eq!(
    can_order(Some(&sub), &orders, now),
    can_order(Some(&sub), &orders, now)
  );
  let a: Vec<Uuid> = orders_for_cycle(&orders, 1).iter().map(|o| o.id).collect();
  let b: Vec<Uuid> = orders_for_cycle(&orders, 1).iter().map(|o| o.id).collect();
  assert_eq!(a, b);
}

// ─── Boundary: sixth order ───────────────────────────────────────────────────

#[test]
fn sixth_order_is_accepted_and_drains_the_counter() {
  let mut sub = subscription("2024-01-15T00:00:00Z");
  let orders: Vec<Order> = (1..=5).map(|c| order_in_cycle(&sub, c)).collect();
  sub.months_remaining = 1;
  let now = dt("2024-06-20T12:00:00Z"); // cycle 6

  let accepted = accept_order(
    Some(&sub),
    &orders,
    book(),
    None,
    ShippingAddress::default(),
    now,
  )
  .unwrap();
  assert_eq!(accepted.order.month, 6);
  assert_eq!(accepted.subscription.months_remaining, 0);

  // Afterwards both counters independently block a seventh.
  let mut history = orders;
  history.push(accepted.order);
  let later = dt("2024-07-05T12:00:00Z");
  assert_eq!(
    check_order(Some(&accepted.subscription), &history, later),
    Err(Error::QuotaExhausted)
  );

  let mut diverged = accepted.subscription.clone();
  diverged.months_remaining = 1;
  assert_eq!(
    check_order(Some(&diverged), &history, later),
    Err(Error::LifetimeCapReached)
  );
}

// ─── next_eligible_date ──────────────────────────────────────────────────────

#[test]
fn next_date_is_now_when_eligible() {
  let sub = subscription("2024-01-15T00:00:00Z");
  let now = dt("2024-01-20T12:00:00Z");
  assert_eq!(next_eligible_date(Some(&sub), &[], now), Some(now));
}

#[test]
fn next_date_rolls_to_first_of_next_month() {
  let sub = subscription("2024-01-15T00:00:00Z");
  let now = dt("2024-03-17T15:42:00Z");
  let orders = vec![order_in_cycle(&sub, cycle_index(sub.start_date, now))];

  assert_eq!(
    next_eligible_date(Some(&sub), &orders, now),
    Some(dt("2024-04-01T00:00:00Z"))
  );
}

#[test]
fn next_date_rolls_across_the_year_end() {
  let sub = subscription("2024-01-15T00:00:00Z");
  let now = dt("2024-12-09T08:00:00Z");
  let orders = vec![order_in_cycle(&sub, cycle_index(sub.start_date, now))];

  assert_eq!(
    next_eligible_date(Some(&sub), &orders, now),
    Some(dt("2025-01-01T00:00:00Z"))
  );
}

#[test]
fn next_date_is_none_without_an_active_subscription() {
  let now = dt("2024-03-17T15:42:00Z");
  assert_eq!(next_eligible_date(None, &[], now), None);

  let mut sub = subscription("2024-01-15T00:00:00Z");
  sub.status = SubscriptionStatus::Cancelled;
  assert_eq!(next_eligible_date(Some(&sub), &[], now), None);
  assert!(!can_order(Some(&sub), &[], now));
}

// ─── Subscription activation ─────────────────────────────────────────────────

#[test]
fn new_subscription_spans_the_plan_length() {
  let now = dt("2024-01-15T10:00:00Z");
  let sub = Subscription::new(
    "bob@example.com",
    Preferences {
      genres: vec!["mystery".into()],
      ..Default::default()
    },
    Some("happy reading".into()),
    now,
  );

  assert_eq!(sub.status, SubscriptionStatus::Active);
  assert_eq!(sub.start_date, now);
  assert_eq!(sub.end_date, dt("2024-07-15T10:00:00Z"));
  assert_eq!(sub.months_remaining, PLAN_LENGTH_MONTHS);
  assert_eq!(sub.user_id, "bob@example.com");
}

#[test]
fn new_subscription_clamps_short_months() {
  // Aug 31 + 6 months lands on Feb 28 (2025 is not a leap year).
  let sub = Subscription::new(
    "bob@example.com",
    Preferences::default(),
    None,
    dt("2024-08-31T10:00:00Z"),
  );
  assert_eq!(sub.end_date, dt("2025-02-28T10:00:00Z"));
}
