//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized: {0}")]
  Unauthorized(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("a subscription already exists for this account")]
  SubscriptionExists,

  /// A typed rejection from the eligibility rules, surfaced unchanged.
  #[error(transparent)]
  Rejected(fabledrop_core::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("catalog error: {0}")]
  Catalog(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, reason) = match &self {
      ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, None),
      ApiError::NotFound(_) => (StatusCode::NOT_FOUND, None),
      ApiError::SubscriptionExists => {
        (StatusCode::CONFLICT, Some("subscription_exists"))
      }
      ApiError::Rejected(e) => {
        let status = match e {
          fabledrop_core::Error::NoActiveSubscription => StatusCode::NOT_FOUND,
          _ => StatusCode::CONFLICT,
        };
        (status, Some(e.code()))
      }
      ApiError::Store(_) | ApiError::Catalog(_) => (StatusCode::BAD_GATEWAY, None),
    };

    let mut body = json!({ "error": self.to_string() });
    if let Some(reason) = reason {
      body["reason"] = json!(reason);
    }
    (status, Json(body)).into_response()
  }
}
