use thiserror::Error;

use stepwise_wire::WireError;

/// Errors surfaced by the client and its transports.
#[derive(Debug, Error)]
pub enum ClientError {
  /// The remote store answered with a non-success status.
  #[error("{message} (#{code})")]
  Api { code: u16, message: String },

  /// The response body could not be parsed as JSON.
  #[error("could not decode response (status {status}): {body}")]
  Decode { status: u16, body: String },

  /// A response that must carry an entity came back empty.
  #[error("empty response from {path}")]
  EmptyBody { path: String },

  /// The consumer secret could not be used as a signing key.
  #[error("invalid signing credentials")]
  InvalidCredentials,

  #[error("invalid url: {0}")]
  Url(#[from] url::ParseError),

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error(transparent)]
  Wire(#[from] WireError),
}

impl ClientError {
  /// Create an API error.
  pub fn api(code: u16, message: impl Into<String>) -> Self {
    Self::Api {
      code,
      message: message.into(),
    }
  }

  /// Status code carried by API errors; decode failures report `0`.
  pub fn code(&self) -> Option<u16> {
    match self {
      Self::Api { code, .. } => Some(*code),
      Self::Decode { .. } => Some(0),
      _ => None,
    }
  }
}
