//! Error type for `fabledrop-google`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("{endpoint} returned status {status}")]
  Status {
    status:   reqwest::StatusCode,
    endpoint: &'static str,
  },

  /// The userinfo endpoint refused the bearer token.
  #[error("identity token rejected ({0})")]
  TokenRejected(reqwest::StatusCode),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
