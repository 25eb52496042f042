//! Error type for `fabledrop-store-sqlite`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("undecodable column value: {0}")]
  Decode(String),

  /// The `(subscription_id, month)` uniqueness constraint fired.
  #[error("subscription {0} already has an order for cycle {1}")]
  DuplicateCycleOrder(Uuid, i32),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
