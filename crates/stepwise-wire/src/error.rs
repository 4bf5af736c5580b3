use thiserror::Error;

use stepwise_graph::{GraphError, Key};

use crate::record::Kind;

/// Errors raised while encoding or decoding wire records.
#[derive(Debug, Error)]
pub enum WireError {
  /// A decoded record violates a graph invariant (missing name, empty key,
  /// step wired across processes).
  #[error("invalid record: {0}")]
  Invalid(#[from] GraphError),

  /// A record refers to a process that is not registered in the decode
  /// context.
  #[error("process not found: {0}")]
  UnknownProcess(Key),

  /// An action refers to a step that is not part of its process.
  #[error("step '{step}' not found in process '{process}'")]
  UnknownStep { process: Key, step: Key },

  /// An action still lists a step that was deleted from its process.
  #[error("action '{action}' in process '{process}' refers to deleted step '{step}'")]
  DanglingStep { process: Key, action: Key, step: Key },

  /// The record's `kind` tag does not match what was asked for.
  #[error("expected a {expected} record, found {found}")]
  UnexpectedKind { expected: Kind, found: Kind },

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

impl WireError {
  /// True for failures caused by an unresolved process or step key.
  pub fn is_reference(&self) -> bool {
    matches!(
      self,
      Self::UnknownProcess(_) | Self::UnknownStep { .. } | Self::DanglingStep { .. }
    )
  }

  /// True for failures caused by a missing or invalid field.
  pub fn is_validation(&self) -> bool {
    matches!(self, Self::Invalid(_))
  }
}
