//! Async client for the Google OAuth2 userinfo endpoint.
//!
//! Implements [`IdentityProvider`]: a bearer token issued by the sign-in
//! flow is exchanged for the profile it belongs to. No token validation
//! happens locally; Google is the authority.

use std::time::Duration;

use fabledrop_core::identity::{IdentityProvider, UserProfile};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{Error, Result};

/// Connection settings for the userinfo endpoint.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
  pub userinfo_url: String,
}

impl Default for IdentityConfig {
  fn default() -> Self {
    Self {
      userinfo_url: "https://www.googleapis.com/oauth2/v3/userinfo".to_owned(),
    }
  }
}

/// The wire shape of a userinfo response. The v3 endpoint calls the stable
/// identifier `sub`; older ones call it `id`.
#[derive(Debug, Deserialize)]
struct UserInfo {
  #[serde(alias = "sub")]
  id:      String,
  email:   String,
  #[serde(default)]
  name:    String,
  picture: Option<String>,
}

#[derive(Clone)]
pub struct GoogleIdentity {
  client: Client,
  config: IdentityConfig,
}

impl GoogleIdentity {
  pub fn new(config: IdentityConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, config })
  }
}

impl IdentityProvider for GoogleIdentity {
  type Error = Error;

  async fn profile_for_token(&self, token: &str) -> Result<UserProfile> {
    let response = self
      .client
      .get(&self.config.userinfo_url)
      .bearer_auth(token)
      .send()
      .await?;

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
      return Err(Error::TokenRejected(status));
    }
    if !status.is_success() {
      return Err(Error::Status {
        status,
        endpoint: "userinfo",
      });
    }

    let info: UserInfo = response.json().await?;
    Ok(UserProfile {
      id:      info.id,
      email:   info.email,
      name:    info.name,
      picture: info.picture,
    })
  }
}
