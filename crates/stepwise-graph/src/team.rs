use std::hash::{Hash, Hasher};

use indexmap::IndexSet;

use crate::error::{GraphError, require_key, require_name};
use crate::key::Key;

/// A named group of member identities that can be assigned to a step.
///
/// Equality and hashing use the key only: two teams with the same key are
/// interchangeable regardless of their other fields.
#[derive(Debug, Clone)]
pub struct Team {
  key: Key,
  name: String,
  description: Option<String>,
  members: IndexSet<String>,
}

impl Team {
  /// Create a team with a freshly generated key.
  pub fn new(name: impl Into<String>) -> Result<Self, GraphError> {
    Self::with_key(Key::generate(), name)
  }

  /// Create a team with a caller-supplied key.
  pub fn with_key(key: impl Into<Key>, name: impl Into<String>) -> Result<Self, GraphError> {
    Ok(Self {
      key: require_key("team", key.into())?,
      name: require_name("team", name.into())?,
      description: None,
      members: IndexSet::new(),
    })
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  pub fn with_members<I, S>(mut self, members: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.set_members(members);
    self
  }

  pub fn key(&self) -> &Key {
    &self.key
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn description(&self) -> Option<&str> {
    self.description.as_deref()
  }

  pub fn members(&self) -> &IndexSet<String> {
    &self.members
  }

  pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), GraphError> {
    self.name = require_name("team", name.into())?;
    Ok(())
  }

  pub fn set_description(&mut self, description: Option<String>) {
    self.description = description;
  }

  /// Add a member. Returns `false` if it was already present.
  pub fn add_member(&mut self, member: impl Into<String>) -> bool {
    self.members.insert(member.into())
  }

  /// Remove a member. Removing an absent member is a no-op.
  pub fn remove_member(&mut self, member: &str) -> bool {
    self.members.shift_remove(member)
  }

  /// Replace the member set, keeping first-seen order and dropping duplicates.
  pub fn set_members<I, S>(&mut self, members: I)
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.members = members.into_iter().map(Into::into).collect();
  }
}

impl PartialEq for Team {
  fn eq(&self, other: &Self) -> bool {
    self.key == other.key
  }
}

impl Eq for Team {}

impl Hash for Team {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.key.hash(state);
  }
}
