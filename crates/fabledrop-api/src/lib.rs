//! JSON REST API for FableDrop.
//!
//! Exposes an axum [`Router`] backed by any
//! [`SubscriptionStore`] + [`BookCatalog`] + [`IdentityProvider`] triple.
//! TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", fabledrop_api::api_router(state))
//! ```

pub mod auth;
pub mod catalog;
pub mod eligibility;
pub mod error;
pub mod orders;
pub mod subscription;

use std::sync::Arc;

use axum::{Router, routing::get};
use fabledrop_core::{
  catalog::BookCatalog, identity::IdentityProvider, store::SubscriptionStore,
};

pub use error::ApiError;

/// Shared state threaded through all handlers. The collaborators are
/// injected here, in one place — no process-wide singletons.
pub struct AppState<S, C, I> {
  pub store:    Arc<S>,
  pub catalog:  Arc<C>,
  pub identity: Arc<I>,
}

impl<S, C, I> Clone for AppState<S, C, I> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      catalog:  Arc::clone(&self.catalog),
      identity: Arc::clone(&self.identity),
    }
  }
}

/// Build a fully-materialised API router for the given collaborators.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, C, I>(state: AppState<S, C, I>) -> Router<()>
where
  S: SubscriptionStore + 'static,
  C: BookCatalog + 'static,
  I: IdentityProvider + 'static,
{
  Router::new()
    // Subscription
    .route(
      "/subscription",
      get(subscription::get_one::<S, C, I>).post(subscription::create::<S, C, I>),
    )
    // Orders
    .route(
      "/orders",
      get(orders::list::<S, C, I>).post(orders::place::<S, C, I>),
    )
    .route("/eligibility", get(eligibility::status::<S, C, I>))
    // Catalog
    .route("/catalog/search", get(catalog::search::<S, C, I>))
    .route("/catalog/curated", get(catalog::curated::<S, C, I>))
    .route("/catalog/genres", get(catalog::genres))
    .with_state(state)
}

#[cfg(test)]
mod tests;
