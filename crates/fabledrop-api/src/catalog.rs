//! Handlers for `/catalog` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/catalog/search` | `?q=<text>[&max=<n>]` |
//! | `GET`  | `/catalog/curated` | The merged multi-genre selection |
//! | `GET`  | `/catalog/genres` | Static curated genre list; no auth |

use axum::{
  Json,
  extract::{Query, State},
  http::HeaderMap,
};
use fabledrop_core::{
  book::{Book, BookGenre},
  catalog::BookCatalog,
  identity::IdentityProvider,
  store::SubscriptionStore,
};
use serde::Deserialize;

use crate::{AppState, auth::authenticate, error::ApiError};

const DEFAULT_MAX_RESULTS: usize = 40;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  pub q:   String,
  /// Maximum results; the upstream API caps a page at 40.
  pub max: Option<usize>,
}

/// `GET /catalog/search?q=<text>[&max=<n>]`
pub async fn search<S, C, I>(
  State(state): State<AppState<S, C, I>>,
  headers: HeaderMap,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Book>>, ApiError>
where
  S: SubscriptionStore,
  C: BookCatalog,
  I: IdentityProvider,
{
  authenticate(state.identity.as_ref(), &headers).await?;

  let books = state
    .catalog
    .search(&params.q, params.max.unwrap_or(DEFAULT_MAX_RESULTS))
    .await
    .map_err(|e| ApiError::Catalog(Box::new(e)))?;
  Ok(Json(books))
}

/// `GET /catalog/curated`
pub async fn curated<S, C, I>(
  State(state): State<AppState<S, C, I>>,
  headers: HeaderMap,
) -> Result<Json<Vec<Book>>, ApiError>
where
  S: SubscriptionStore,
  C: BookCatalog,
  I: IdentityProvider,
{
  authenticate(state.identity.as_ref(), &headers).await?;

  let books = state
    .catalog
    .curated()
    .await
    .map_err(|e| ApiError::Catalog(Box::new(e)))?;
  Ok(Json(books))
}

/// `GET /catalog/genres` — static data, no auth required.
pub async fn genres() -> Json<Vec<BookGenre>> {
  Json(BookGenre::curated())
}
