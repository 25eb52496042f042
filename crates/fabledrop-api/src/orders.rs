//! Handlers for `/orders` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/orders` | All of the caller's orders, in insertion order |
//! | `POST` | `/orders` | Body: [`PlaceBody`]; 201 + `{order, subscription}` |

use axum::{
  Json,
  extract::State,
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
};
use chrono::Utc;
use fabledrop_core::{
  book::Book,
  catalog::BookCatalog,
  eligibility::accept_order,
  identity::IdentityProvider,
  order::{Order, ShippingAddress},
  store::{CommitError, SubscriptionStore},
};
use serde::Deserialize;

use crate::{AppState, auth::authenticate, error::ApiError};

/// `GET /orders`
pub async fn list<S, C, I>(
  State(state): State<AppState<S, C, I>>,
  headers: HeaderMap,
) -> Result<Json<Vec<Order>>, ApiError>
where
  S: SubscriptionStore,
  C: BookCatalog,
  I: IdentityProvider,
{
  let profile = authenticate(state.identity.as_ref(), &headers).await?;

  let orders = state
    .store
    .get_orders(&profile.email)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(orders))
}

/// JSON body accepted by `POST /orders`.
#[derive(Debug, Deserialize)]
pub struct PlaceBody {
  /// The catalog snapshot to embed in the order.
  pub book:             Book,
  pub personal_message: Option<String>,
  /// Defaults to the fixed gift-recipient destination when omitted.
  pub shipping_address: Option<ShippingAddress>,
}

/// `POST /orders` — run the eligibility check against the stored state, then
/// commit the accepted order and the decremented subscription in one store
/// transaction. A rejection (either from the read-side check or from the
/// store's write-time invariant) comes back as a typed 404/409.
pub async fn place<S, C, I>(
  State(state): State<AppState<S, C, I>>,
  headers: HeaderMap,
  Json(body): Json<PlaceBody>,
) -> Result<impl IntoResponse, ApiError>
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

  let accepted = accept_order(
    subscription.as_ref(),
    &orders,
    body.book,
    body.personal_message,
    body.shipping_address.unwrap_or_default(),
    Utc::now(),
  )
  .map_err(ApiError::Rejected)?;

  state
    .store
    .commit_order(
      &profile.email,
      accepted.order.clone(),
      accepted.subscription.clone(),
    )
    .await
    .map_err(|e| match e {
      CommitError::Rejected(reason) => ApiError::Rejected(reason),
      CommitError::Store(e) => ApiError::Store(Box::new(e)),
    })?;

  Ok((StatusCode::CREATED, Json(accepted)))
}
