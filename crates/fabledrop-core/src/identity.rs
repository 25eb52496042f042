//! The `IdentityProvider` trait and the profile record it resolves.
//!
//! The engine itself never authenticates anyone; of the whole profile, only
//! `email` reaches its collaborators, as the store key.

use std::future::Future;

use serde::{Deserialize, Serialize};

/// The identity provider's view of a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
  pub id:      String,
  pub email:   String,
  #[serde(default)]
  pub name:    String,
  pub picture: Option<String>,
}

/// Abstraction over a third-party identity provider: given a bearer token,
/// return the profile it belongs to, or fail if the token is not valid.
pub trait IdentityProvider: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn profile_for_token<'a>(
    &'a self,
    token: &'a str,
  ) -> impl Future<Output = Result<UserProfile, Self::Error>> + Send + 'a;
}
