use indexmap::IndexSet;

use crate::error::{GraphError, require_name};
use crate::key::Key;
use crate::process::Process;
use crate::step::Step;

/// A named transition from one or more incoming steps to zero or more
/// outgoing steps, or to the implicit finish sink when complete.
///
/// `is_complete` and a non-empty outgoing set are mutually exclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
  pub(crate) key: Key,
  pub(crate) process: Key,
  pub(crate) name: String,
  pub(crate) is_complete: bool,
  pub(crate) incoming: IndexSet<Key>,
  pub(crate) outgoing: IndexSet<Key>,
}

impl Action {
  /// Build a detached action for `process`. It becomes part of the graph
  /// once passed to [`Process::insert_action`].
  pub fn new(process: &Process, name: impl Into<String>) -> Result<Self, GraphError> {
    Ok(Self {
      key: Key::generate(),
      process: process.key().clone(),
      name: require_name("action", name.into())?,
      is_complete: false,
      incoming: IndexSet::new(),
      outgoing: IndexSet::new(),
    })
  }

  pub fn with_key(mut self, key: impl Into<Key>) -> Self {
    self.key = key.into();
    self
  }

  pub fn key(&self) -> &Key {
    &self.key
  }

  pub fn process_key(&self) -> &Key {
    &self.process
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn is_complete(&self) -> bool {
    self.is_complete
  }

  pub fn incoming(&self) -> &IndexSet<Key> {
    &self.incoming
  }

  pub fn outgoing(&self) -> &IndexSet<Key> {
    &self.outgoing
  }

  pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), GraphError> {
    self.name = require_name("action", name.into())?;
    Ok(())
  }

  /// Mark the action terminal (or not). Fails while outgoing steps exist.
  pub fn set_complete(&mut self, complete: bool) -> Result<(), GraphError> {
    if complete && !self.outgoing.is_empty() {
      return Err(GraphError::CompleteWithOutgoing {
        action: self.key.clone(),
      });
    }
    self.is_complete = complete;
    Ok(())
  }

  /// Register `step` as an incoming step. Returns `false` if already present.
  pub fn add_incoming_step(&mut self, step: &Step) -> Result<bool, GraphError> {
    self.check_same_process(step)?;
    Ok(self.incoming.insert(step.key().clone()))
  }

  /// Register `step` as an outgoing step. Always clears `is_complete`.
  pub fn add_outgoing_step(&mut self, step: &Step) -> Result<bool, GraphError> {
    self.check_same_process(step)?;
    self.is_complete = false;
    Ok(self.outgoing.insert(step.key().clone()))
  }

  pub fn remove_incoming_step(&mut self, step: &Key) -> bool {
    self.incoming.shift_remove(step)
  }

  pub fn remove_outgoing_step(&mut self, step: &Key) -> bool {
    self.outgoing.shift_remove(step)
  }

  fn check_same_process(&self, step: &Step) -> Result<(), GraphError> {
    if step.process_key() != &self.process {
      return Err(GraphError::ForeignStep {
        step: step.key().clone(),
        step_process: step.process_key().clone(),
        process: self.process.clone(),
      });
    }
    Ok(())
  }
}
