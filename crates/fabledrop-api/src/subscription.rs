//! Handlers for `/subscription` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/subscription` | 404 if the caller has none |
//! | `POST` | `/subscription` | Body: [`CreateBody`]; 409 if one exists |

use axum::{
  Json,
  extract::State,
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
};
use chrono::Utc;
use fabledrop_core::{
  catalog::BookCatalog,
  identity::IdentityProvider,
  store::SubscriptionStore,
  subscription::{Preferences, Subscription},
};
use serde::Deserialize;

use crate::{AppState, auth::authenticate, error::ApiError};

/// `GET /subscription`
pub async fn get_one<S, C, I>(
  State(state): State<AppState<S, C, I>>,
  headers: HeaderMap,
) -> Result<Json<Subscription>, ApiError>
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
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!("no subscription for {}", profile.email))
    })?;
  Ok(Json(subscription))
}

/// JSON body accepted by `POST /subscription`.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  #[serde(default)]
  pub preferences:  Preferences,
  pub gift_message: Option<String>,
}

/// `POST /subscription` — activate the caller's plan. Returns 201 + the
/// stored [`Subscription`], or 409 if one already exists.
pub async fn create<S, C, I>(
  State(state): State<AppState<S, C, I>>,
  headers: HeaderMap,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SubscriptionStore,
  C: BookCatalog,
  I: IdentityProvider,
{
  let profile = authenticate(state.identity.as_ref(), &headers).await?;

  let existing = state
    .store
    .get_subscription(&profile.email)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if existing.is_some() {
    return Err(ApiError::SubscriptionExists);
  }

  let subscription = Subscription::new(
    profile.email.clone(),
    body.preferences,
    body.gift_message,
    Utc::now(),
  );
  state
    .store
    .put_subscription(&profile.email, subscription.clone())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok((StatusCode::CREATED, Json(subscription)))
}
