//! HTTP clients for the Google collaborators.
//!
//! Two external services back the subscription surface: the Google Books
//! volumes API (catalog search, implements
//! [`fabledrop_core::catalog::BookCatalog`]) and the OAuth2 userinfo endpoint
//! (identity, implements [`fabledrop_core::identity::IdentityProvider`]).
//! Neither client retries; failures surface to the caller unchanged.

pub mod books;
pub mod error;
pub mod identity;

pub use books::{BooksConfig, GoogleBooksClient};
pub use error::{Error, Result};
pub use identity::{GoogleIdentity, IdentityConfig};
