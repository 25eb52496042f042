//! Bearer-token authentication against the injected identity provider.

use axum::http::{HeaderMap, header};
use fabledrop_core::identity::{IdentityProvider, UserProfile};

use crate::error::ApiError;

/// Resolve the caller's profile from the `Authorization: Bearer` header.
///
/// Any identity-provider failure is reported as 401; this layer does not
/// distinguish an invalid token from an unreachable provider.
pub async fn authenticate<I>(
  identity: &I,
  headers: &HeaderMap,
) -> Result<UserProfile, ApiError>
where
  I: IdentityProvider,
{
  let token = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .filter(|t| !t.is_empty())
    .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_owned()))?;

  identity
    .profile_for_token(token)
    .await
    .map_err(|e| ApiError::Unauthorized(e.to_string()))
}
