//! The `SubscriptionStore` trait — the persistence contract for
//! subscriptions and their orders.
//!
//! The trait is implemented by storage backends (e.g.
//! `fabledrop-store-sqlite`). Higher layers depend on this abstraction, not
//! on any concrete backend. Records are keyed by the subscriber's email.

use std::future::Future;

use thiserror::Error;

use crate::{order::Order, subscription::Subscription};

// ─── Commit outcome ──────────────────────────────────────────────────────────

/// Failure of [`SubscriptionStore::commit_order`].
///
/// `Rejected` carries the engine's own rejection type so callers can treat a
/// write-time duplicate exactly like a read-time one — it is the same rule,
/// enforced a second time where races cannot reach it.
#[derive(Debug, Error)]
pub enum CommitError<E: std::error::Error + 'static> {
  #[error("order rejected: {0}")]
  Rejected(crate::Error),

  #[error("store error: {0}")]
  Store(#[source] E),
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a subscription/order store backend.
///
/// Orders are append-only: no update or delete operation exists. Adapters do
/// no retry or backoff; failures surface to the caller unchanged.
///
/// Required write-time invariant: at most one order per
/// `(subscription_id, month)` may ever be accepted, enforced by the backend
/// itself (uniqueness constraint or equivalent optimistic check). The
/// engine's read-then-decide pass cannot provide this — two callers reading
/// a stale order list concurrently would both pass it.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait SubscriptionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch the subscription for `user_email`. Returns `None` if the user has
  /// never activated one.
  fn get_subscription<'a>(
    &'a self,
    user_email: &'a str,
  ) -> impl Future<Output = Result<Option<Subscription>, Self::Error>> + Send + 'a;

  /// Create or replace the subscription for `user_email`.
  fn put_subscription<'a>(
    &'a self,
    user_email: &'a str,
    subscription: Subscription,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// All orders for `user_email`, in insertion order.
  ///
  /// A stored record that can no longer be decoded is skipped rather than
  /// failing the read — one corrupt row must not block eligibility for the
  /// rest.
  fn get_orders<'a>(
    &'a self,
    user_email: &'a str,
  ) -> impl Future<Output = Result<Vec<Order>, Self::Error>> + Send + 'a;

  /// Append a single order. Subject to the write-time invariant above.
  fn append_order<'a>(
    &'a self,
    user_email: &'a str,
    order: Order,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Atomically append `order` and store `subscription`, as produced by one
  /// [`accept_order`](crate::eligibility::accept_order) call. Either both
  /// writes land or neither does.
  ///
  /// A second order for the same `(subscription_id, month)` fails with
  /// [`CommitError::Rejected`] carrying the one-per-cycle rejection, which
  /// is what makes two concurrent acceptances for one cycle impossible.
  fn commit_order<'a>(
    &'a self,
    user_email: &'a str,
    order: Order,
    subscription: Subscription,
  ) -> impl Future<Output = Result<(), CommitError<Self::Error>>> + Send + 'a;
}
