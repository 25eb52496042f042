//! The `BookCatalog` trait — the catalog-search collaborator contract.
//!
//! The engine never calls the catalog; it only embeds a selected [`Book`]
//! snapshot into an order. The trait exists so the API surface can browse
//! and search without knowing which external service backs it.

use std::future::Future;

use crate::book::Book;

/// Abstraction over an external book-search service.
///
/// Calls are fire-and-forget from the caller's perspective: no retry or
/// backoff happens here; a failure surfaces unchanged.
pub trait BookCatalog: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Free-text search, returning at most `max_results` records.
  fn search<'a>(
    &'a self,
    query: &'a str,
    max_results: usize,
  ) -> impl Future<Output = Result<Vec<Book>, Self::Error>> + Send + 'a;

  /// The curated multi-genre selection shown before any search.
  fn curated(&self) -> impl Future<Output = Result<Vec<Book>, Self::Error>> + Send + '_;
}
