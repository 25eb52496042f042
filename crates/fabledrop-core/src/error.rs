//! Error types for `fabledrop-core`.
//!
//! Every engine failure is a typed rejection; the calling layer decides what
//! to do with it. The engine itself never logs and never falls back to a
//! default.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
  /// No subscription on record, or its status is not `active`.
  #[error("no active subscription found")]
  NoActiveSubscription,

  /// `months_remaining` has run out. Distinct from the lifetime cap: the two
  /// counters start equal but are allowed to diverge.
  #[error("no subscription months remaining")]
  QuotaExhausted,

  /// The fixed maximum of orders for one subscription has been reached.
  #[error("maximum number of books for this subscription reached")]
  LifetimeCapReached,

  /// An order was already placed in the current billing cycle.
  #[error("a book was already ordered this month")]
  AlreadyOrderedThisCycle,
}

impl Error {
  /// Stable machine-readable identifier, carried in API rejection payloads.
  pub fn code(&self) -> &'static str {
    match self {
      Self::NoActiveSubscription => "no_active_subscription",
      Self::QuotaExhausted => "quota_exhausted",
      Self::LifetimeCapReached => "lifetime_cap_reached",
      Self::AlreadyOrderedThisCycle => "already_ordered_this_cycle",
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
