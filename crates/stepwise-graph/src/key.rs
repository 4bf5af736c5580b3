use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier used as the sole handle for equality and lookup of
/// processes, steps, actions and teams.
#[derive(
  Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Key(String);

impl Key {
  /// Generate a fresh random key (UUID v4).
  pub fn generate() -> Self {
    Self(uuid::Uuid::new_v4().to_string())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn into_string(self) -> String {
    self.0
  }
}

impl fmt::Display for Key {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<String> for Key {
  fn from(value: String) -> Self {
    Self(value)
  }
}

impl From<&str> for Key {
  fn from(value: &str) -> Self {
    Self(value.to_string())
  }
}

impl From<&Key> for Key {
  fn from(value: &Key) -> Self {
    value.clone()
  }
}

impl AsRef<str> for Key {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

impl Borrow<str> for Key {
  fn borrow(&self) -> &str {
    &self.0
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;

  #[test]
  fn test_generate_is_unique() {
    let keys: HashSet<Key> = (0..1000).map(|_| Key::generate()).collect();
    assert_eq!(keys.len(), 1000);
  }

  #[test]
  fn test_generated_key_is_uuid() {
    let key = Key::generate();
    assert!(uuid::Uuid::parse_str(key.as_str()).is_ok());
  }

  #[test]
  fn test_serializes_as_plain_string() {
    let key = Key::from("step-1");
    assert_eq!(serde_json::to_string(&key).unwrap(), "\"step-1\"");
    let back: Key = serde_json::from_str("\"step-1\"").unwrap();
    assert_eq!(back, key);
  }
}
