use std::ops::{Deref, DerefMut};

use indexmap::IndexSet;

use crate::action::Action;
use crate::error::{GraphError, require_name};
use crate::key::Key;
use crate::process::Process;
use crate::team::Team;

/// A node of the workflow graph.
///
/// A step refers back to its process by key only; the process owns the step.
/// Teams are associated by key as well and live independently.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
  pub(crate) key: Key,
  pub(crate) process: Key,
  pub(crate) name: String,
  pub(crate) description: Option<String>,
  pub(crate) is_start: bool,
  pub(crate) teams: IndexSet<Key>,
  pub(crate) members: IndexSet<String>,
}

impl Step {
  /// Build a detached step for `process`. It becomes part of the graph once
  /// passed to [`Process::insert_step`].
  pub fn new(process: &Process, name: impl Into<String>) -> Result<Self, GraphError> {
    Ok(Self {
      key: Key::generate(),
      process: process.key().clone(),
      name: require_name("step", name.into())?,
      description: None,
      is_start: false,
      teams: IndexSet::new(),
      members: IndexSet::new(),
    })
  }

  pub fn with_key(mut self, key: impl Into<Key>) -> Self {
    self.key = key.into();
    self
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  /// Request the start flag. The owning process has the final say when the
  /// step is inserted.
  pub fn with_start(mut self, is_start: bool) -> Self {
    self.is_start = is_start;
    self
  }

  pub fn with_team(mut self, team: &Team) -> Self {
    self.teams.insert(team.key().clone());
    self
  }

  pub fn with_team_keys<I, K>(mut self, teams: I) -> Self
  where
    I: IntoIterator<Item = K>,
    K: Into<Key>,
  {
    self.teams.extend(teams.into_iter().map(Into::into));
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

  pub fn process_key(&self) -> &Key {
    &self.process
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn description(&self) -> Option<&str> {
    self.description.as_deref()
  }

  pub fn is_start(&self) -> bool {
    self.is_start
  }

  /// Keys of the teams assigned to this step.
  pub fn teams(&self) -> &IndexSet<Key> {
    &self.teams
  }

  pub fn members(&self) -> &IndexSet<String> {
    &self.members
  }

  pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), GraphError> {
    self.name = require_name("step", name.into())?;
    Ok(())
  }

  pub fn set_description(&mut self, description: Option<String>) {
    self.description = description;
  }

  pub fn add_team(&mut self, team: &Team) -> bool {
    self.teams.insert(team.key().clone())
  }

  pub fn remove_team(&mut self, team: &Key) -> bool {
    self.teams.shift_remove(team)
  }

  pub fn set_teams<'t, I>(&mut self, teams: I)
  where
    I: IntoIterator<Item = &'t Team>,
  {
    self.teams = teams.into_iter().map(|t| t.key().clone()).collect();
  }

  pub fn add_member(&mut self, member: impl Into<String>) -> bool {
    self.members.insert(member.into())
  }

  pub fn remove_member(&mut self, member: &str) -> bool {
    self.members.shift_remove(member)
  }

  pub fn set_members<I, S>(&mut self, members: I)
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.members = members.into_iter().map(Into::into).collect();
  }
}

/// Optional arguments for [`Process::add_step_with`].
#[derive(Debug, Clone, Default)]
pub struct StepOptions {
  pub(crate) key: Option<Key>,
  pub(crate) description: Option<String>,
  pub(crate) is_start: bool,
  pub(crate) teams: Vec<Key>,
  pub(crate) members: Vec<String>,
}

impl StepOptions {
  pub fn key(mut self, key: impl Into<Key>) -> Self {
    self.key = Some(key.into());
    self
  }

  pub fn description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  /// Ask for the start flag. Only the first step of a process is ever the
  /// start step, so this has no effect on later steps.
  pub fn start(mut self, is_start: bool) -> Self {
    self.is_start = is_start;
    self
  }

  pub fn team(mut self, team: &Team) -> Self {
    self.teams.push(team.key().clone());
    self
  }

  pub fn member(mut self, member: impl Into<String>) -> Self {
    self.members.push(member.into());
    self
  }
}

/// Optional arguments for [`StepMut::add_action`].
#[derive(Debug, Clone, Default)]
pub struct ActionOptions {
  pub(crate) key: Option<Key>,
  pub(crate) next_step: Option<Key>,
  pub(crate) is_complete: bool,
}

impl ActionOptions {
  pub fn key(mut self, key: impl Into<Key>) -> Self {
    self.key = Some(key.into());
    self
  }

  pub fn next_step(mut self, step: impl Into<Key>) -> Self {
    self.next_step = Some(step.into());
    self
  }

  /// Make the action terminal. Ignored when a next step is also given.
  pub fn complete(mut self) -> Self {
    self.is_complete = true;
    self
  }
}

/// Changes applied by [`StepMut::update_action`].
#[derive(Debug, Clone)]
pub struct ActionUpdate {
  pub(crate) name: String,
  pub(crate) next_step: Option<Key>,
  pub(crate) is_complete: Option<bool>,
}

impl ActionUpdate {
  pub fn rename(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      next_step: None,
      is_complete: None,
    }
  }

  pub fn next_step(mut self, step: impl Into<Key>) -> Self {
    self.next_step = Some(step.into());
    self
  }

  pub fn complete(mut self, is_complete: bool) -> Self {
    self.is_complete = Some(is_complete);
    self
  }
}

/// Mutable cursor over one step of a process.
///
/// Dereferences to the [`Step`] and carries the step-scoped action
/// operations, which need access to the owning process.
pub struct StepMut<'p> {
  pub(crate) process: &'p mut Process,
  pub(crate) key: Key,
}

impl StepMut<'_> {
  /// Create an action leaving this step, optionally pointing at `next_step`.
  pub fn add_action(
    &mut self,
    name: impl Into<String>,
    options: ActionOptions,
  ) -> Result<Key, GraphError> {
    let mut action = Action::new(self.process, name)?;
    if let Some(key) = options.key {
      action = action.with_key(key);
    }
    action.set_complete(options.is_complete)?;
    action.add_incoming_step(&self.process.steps[&self.key])?;

    if let Some(next) = &options.next_step {
      let next_step = self.process.require_step(next)?;
      action.add_outgoing_step(next_step)?;
    }

    self.process.insert_action(action)
  }

  /// Actions leaving this step, optionally filtered by name.
  pub fn actions_by_name(&self, name: Option<&str>) -> Vec<&Action> {
    self.process.step_actions(&self.key, name)
  }

  /// Remove every action named `name` that leaves this step.
  pub fn delete_actions_by_name(&mut self, name: &str) -> Vec<Action> {
    let keys: Vec<Key> = self
      .actions_by_name(Some(name))
      .into_iter()
      .map(|a| a.key.clone())
      .collect();

    let removed: Vec<Action> = keys
      .iter()
      .filter_map(|k| self.process.actions.shift_remove(k))
      .collect();

    tracing::debug!(
      process = %self.process.key(),
      step = %self.key,
      action = name,
      removed = removed.len(),
      "deleted actions"
    );
    removed
  }

  /// Rename every action named `old_name` leaving this step and apply the
  /// optional completion flag and next step. Adding a next step always
  /// clears completion. Returns the number of actions updated.
  pub fn update_action(
    &mut self,
    old_name: &str,
    update: ActionUpdate,
  ) -> Result<usize, GraphError> {
    let name = require_name("action", update.name)?;
    if let Some(next) = &update.next_step {
      self.process.require_step(next)?;
    }

    let keys: Vec<Key> = self
      .actions_by_name(Some(old_name))
      .into_iter()
      .map(|a| a.key.clone())
      .collect();

    if update.next_step.is_none()
      && update.is_complete == Some(true)
      && let Some(blocked) = keys
        .iter()
        .find(|k| !self.process.actions[*k].outgoing.is_empty())
    {
      return Err(GraphError::CompleteWithOutgoing {
        action: blocked.clone(),
      });
    }

    let Process { steps, actions, .. } = &mut *self.process;
    for key in &keys {
      let action = &mut actions[key];
      action.name = name.clone();
      match &update.next_step {
        Some(next) => {
          action.add_outgoing_step(&steps[next])?;
        }
        None => {
          if let Some(complete) = update.is_complete {
            action.set_complete(complete)?;
          }
        }
      }
    }

    Ok(keys.len())
  }
}

impl Deref for StepMut<'_> {
  type Target = Step;

  fn deref(&self) -> &Step {
    &self.process.steps[&self.key]
  }
}

impl DerefMut for StepMut<'_> {
  fn deref_mut(&mut self) -> &mut Step {
    &mut self.process.steps[&self.key]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_add_action_with_next_step() {
    let mut process = Process::new("expenses").unwrap();
    let a = process.add_step("submit").unwrap();
    let b = process.add_step("review").unwrap();

    let action_key = process
      .step_mut(&a)
      .unwrap()
      .add_action("send", ActionOptions::default().next_step(&b).complete())
      .unwrap();

    let action = process.action(&action_key).unwrap();
    assert_eq!(action.name(), "send");
    assert!(!action.is_complete());
    assert!(action.incoming().contains(&a));
    assert!(action.outgoing().contains(&b));
  }

  #[test]
  fn test_add_action_unknown_next_step() {
    let mut process = Process::new("expenses").unwrap();
    let a = process.add_step("submit").unwrap();

    let result = process
      .step_mut(&a)
      .unwrap()
      .add_action("send", ActionOptions::default().next_step("nope"));
    assert!(matches!(result, Err(GraphError::UnknownStep { .. })));
    assert_eq!(process.actions().count(), 0);
  }

  #[test]
  fn test_actions_by_name_filters_on_incoming_step() {
    let mut process = Process::new("expenses").unwrap();
    let a = process.add_step("submit").unwrap();
    let b = process.add_step("review").unwrap();

    let mut step = process.step_mut(&a).unwrap();
    step
      .add_action("approve", ActionOptions::default().next_step(&b))
      .unwrap();
    step
      .add_action("decline", ActionOptions::default().next_step(&a))
      .unwrap();
    assert_eq!(step.actions_by_name(None).len(), 2);
    assert_eq!(step.actions_by_name(Some("approve")).len(), 1);
    assert!(step.actions_by_name(Some("missing")).is_empty());

    let step_b = process.step_mut(&b).unwrap();
    assert!(step_b.actions_by_name(None).is_empty());
  }

  #[test]
  fn test_delete_actions_by_name() {
    let mut process = Process::new("expenses").unwrap();
    let a = process.add_step("submit").unwrap();
    let b = process.add_step("review").unwrap();

    let mut step = process.step_mut(&a).unwrap();
    step
      .add_action("approve", ActionOptions::default().next_step(&b))
      .unwrap();
    step
      .add_action("approve", ActionOptions::default().complete())
      .unwrap();
    step
      .add_action("decline", ActionOptions::default().next_step(&a))
      .unwrap();

    assert_eq!(step.delete_actions_by_name("approve").len(), 2);
    assert!(step.delete_actions_by_name("approve").is_empty());
    assert_eq!(process.actions().count(), 1);
  }

  #[test]
  fn test_update_action_next_step_wins_over_complete() {
    let mut process = Process::new("expenses").unwrap();
    let a = process.add_step("submit").unwrap();
    let b = process.add_step("review").unwrap();

    let mut step = process.step_mut(&a).unwrap();
    let key = step
      .add_action("approve", ActionOptions::default())
      .unwrap();
    let updated = step
      .update_action(
        "approve",
        ActionUpdate::rename("accept").complete(true).next_step(&b),
      )
      .unwrap();
    assert_eq!(updated, 1);

    let action = process.action(&key).unwrap();
    assert_eq!(action.name(), "accept");
    assert!(!action.is_complete());
    assert!(action.outgoing().contains(&b));
  }

  #[test]
  fn test_update_action_sets_complete() {
    let mut process = Process::new("expenses").unwrap();
    let a = process.add_step("submit").unwrap();

    let mut step = process.step_mut(&a).unwrap();
    let key = step.add_action("close", ActionOptions::default()).unwrap();
    step
      .update_action("close", ActionUpdate::rename("close").complete(true))
      .unwrap();
    assert_eq!(step.update_action("missing", ActionUpdate::rename("x")), Ok(0));

    assert!(process.action(&key).unwrap().is_complete());
  }

  #[test]
  fn test_update_action_complete_conflict_changes_nothing() {
    let mut process = Process::new("expenses").unwrap();
    let a = process.add_step("submit").unwrap();
    let b = process.add_step("review").unwrap();

    let mut step = process.step_mut(&a).unwrap();
    let open = step
      .add_action("approve", ActionOptions::default())
      .unwrap();
    let routed = step
      .add_action("approve", ActionOptions::default().next_step(&b))
      .unwrap();

    let err = step
      .update_action("approve", ActionUpdate::rename("accept").complete(true))
      .unwrap_err();
    assert_eq!(err, GraphError::CompleteWithOutgoing { action: routed.clone() });

    for key in [&open, &routed] {
      let action = process.action(key).unwrap();
      assert_eq!(action.name(), "approve");
      assert!(!action.is_complete());
    }
    assert!(process.action(&routed).unwrap().outgoing().contains(&b));
  }

  #[test]
  fn test_step_fields_through_cursor() {
    let mut process = Process::new("expenses").unwrap();
    let team = Team::with_key("t-1", "finance").unwrap();
    let a = process.add_step("submit").unwrap();

    let mut step = process.step_mut(&a).unwrap();
    assert!(step.add_team(&team));
    assert!(!step.add_team(&team));
    step.add_member("cfo@example.com");
    step.set_description(Some("submit a claim".to_string()));
    assert!(matches!(step.set_name(""), Err(GraphError::EmptyName { .. })));

    let step = process.step(&a).unwrap();
    assert_eq!(step.teams().len(), 1);
    assert_eq!(step.members().len(), 1);
    assert_eq!(step.description(), Some("submit a claim"));
    assert_eq!(step.name(), "submit");
  }
}
