use std::fmt;

use async_trait::async_trait;

use crate::error::ClientError;

/// HTTP verbs used against the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
  Get,
  Put,
  Post,
  Delete,
}

impl Verb {
  pub fn as_str(&self) -> &'static str {
    match self {
      Verb::Get => "GET",
      Verb::Put => "PUT",
      Verb::Post => "POST",
      Verb::Delete => "DELETE",
    }
  }
}

impl fmt::Display for Verb {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Capability that moves JSON documents to and from the remote store.
///
/// Implementations own signing and connection handling. An empty response
/// body is a valid answer and comes back as `None`.
#[async_trait]
pub trait Transport: Send + Sync {
  /// Issue `verb` against `path` (relative to the store's base URI).
  ///
  /// For `GET`, an object body is sent as query parameters; otherwise the
  /// body is sent as JSON.
  async fn request(
    &self,
    path: &str,
    verb: Verb,
    body: Option<serde_json::Value>,
  ) -> Result<Option<serde_json::Value>, ClientError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
  async fn request(
    &self,
    path: &str,
    verb: Verb,
    body: Option<serde_json::Value>,
  ) -> Result<Option<serde_json::Value>, ClientError> {
    (**self).request(path, verb, body).await
  }
}
