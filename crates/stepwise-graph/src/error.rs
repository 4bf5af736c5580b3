use thiserror::Error;

use crate::key::Key;

/// Validation failures raised while building or mutating a workflow graph.
///
/// Every variant is raised synchronously at the point of violation and the
/// graph is left untouched when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
  /// A required name was empty.
  #[error("{entity} name must not be empty")]
  EmptyName { entity: &'static str },

  /// A required key was empty.
  #[error("{entity} key must not be empty")]
  EmptyKey { entity: &'static str },

  /// A step key did not resolve to a step of the process.
  #[error("step '{step}' not found in process '{process}'")]
  UnknownStep { process: Key, step: Key },

  /// A step from another process was wired into an action.
  #[error("step '{step}' belongs to process '{step_process}', not '{process}'")]
  ForeignStep {
    step: Key,
    step_process: Key,
    process: Key,
  },

  /// An entity constructed for one process was inserted into another.
  #[error("{entity} '{key}' was built for process '{owner}', not '{process}'")]
  WrongProcess {
    entity: &'static str,
    key: Key,
    owner: Key,
    process: Key,
  },

  /// A restored set of steps does not carry exactly one start step.
  #[error("process '{process}' must have exactly one start step, found {starts}")]
  StartStep { process: Key, starts: usize },

  /// An action cannot be terminal while it still has outgoing steps.
  #[error("action '{action}' has outgoing steps and cannot be marked complete")]
  CompleteWithOutgoing { action: Key },
}

impl GraphError {
  pub(crate) fn empty_name(entity: &'static str) -> Self {
    Self::EmptyName { entity }
  }

  pub(crate) fn empty_key(entity: &'static str) -> Self {
    Self::EmptyKey { entity }
  }
}

/// Reject empty names.
pub(crate) fn require_name(entity: &'static str, name: String) -> Result<String, GraphError> {
  if name.is_empty() {
    return Err(GraphError::empty_name(entity));
  }
  Ok(name)
}

/// Reject empty keys.
pub(crate) fn require_key(entity: &'static str, key: Key) -> Result<Key, GraphError> {
  if key.is_empty() {
    return Err(GraphError::empty_key(entity));
  }
  Ok(key)
}
