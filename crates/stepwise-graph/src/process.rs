use indexmap::IndexMap;

use crate::action::Action;
use crate::dot;
use crate::error::{GraphError, require_key, require_name};
use crate::key::Key;
use crate::step::{Step, StepMut, StepOptions};

/// A workflow definition: a directed graph of steps connected by actions.
///
/// The process owns its steps and actions, indexed by key in insertion
/// order. A non-empty process always has exactly one start step.
#[derive(Debug, Clone, PartialEq)]
pub struct Process {
  pub(crate) key: Key,
  pub(crate) name: String,
  pub(crate) description: Option<String>,
  pub(crate) collect_stats: bool,
  pub(crate) steps: IndexMap<Key, Step>,
  pub(crate) actions: IndexMap<Key, Action>,
}

/// Result of [`Process::steps_by_name`].
///
/// A single match is returned directly; zero or several matches come back
/// as a list.
#[derive(Debug, PartialEq)]
pub enum StepMatch<'a> {
  One(&'a Step),
  Many(Vec<&'a Step>),
}

impl<'a> StepMatch<'a> {
  pub fn len(&self) -> usize {
    match self {
      StepMatch::One(_) => 1,
      StepMatch::Many(steps) => steps.len(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn into_vec(self) -> Vec<&'a Step> {
    match self {
      StepMatch::One(step) => vec![step],
      StepMatch::Many(steps) => steps,
    }
  }
}

impl Process {
  /// Create an empty process with a freshly generated key.
  pub fn new(name: impl Into<String>) -> Result<Self, GraphError> {
    Self::with_key(Key::generate(), name)
  }

  /// Create an empty process with a caller-supplied key.
  pub fn with_key(key: impl Into<Key>, name: impl Into<String>) -> Result<Self, GraphError> {
    Ok(Self {
      key: require_key("process", key.into())?,
      name: require_name("process", name.into())?,
      description: None,
      collect_stats: false,
      steps: IndexMap::new(),
      actions: IndexMap::new(),
    })
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  pub fn with_collect_stats(mut self, collect_stats: bool) -> Self {
    self.collect_stats = collect_stats;
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

  pub fn collect_stats(&self) -> bool {
    self.collect_stats
  }

  pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), GraphError> {
    self.name = require_name("process", name.into())?;
    Ok(())
  }

  pub fn set_description(&mut self, description: Option<String>) {
    self.description = description;
  }

  pub fn set_collect_stats(&mut self, collect_stats: bool) {
    self.collect_stats = collect_stats;
  }

  /// Steps in insertion order.
  pub fn steps(&self) -> impl Iterator<Item = &Step> {
    self.steps.values()
  }

  /// Actions in insertion order.
  pub fn actions(&self) -> impl Iterator<Item = &Action> {
    self.actions.values()
  }

  pub fn step(&self, key: &Key) -> Option<&Step> {
    self.steps.get(key)
  }

  /// Cursor over a step, exposing the step-scoped action operations.
  pub fn step_mut(&mut self, key: &Key) -> Option<StepMut<'_>> {
    if !self.steps.contains_key(key) {
      return None;
    }
    Some(StepMut {
      process: self,
      key: key.clone(),
    })
  }

  pub fn action(&self, key: &Key) -> Option<&Action> {
    self.actions.get(key)
  }

  pub fn action_mut(&mut self, key: &Key) -> Option<&mut Action> {
    self.actions.get_mut(key)
  }

  pub fn start_step(&self) -> Option<&Step> {
    self.steps.values().find(|s| s.is_start)
  }

  /// Add a step named `name` with default options.
  pub fn add_step(&mut self, name: impl Into<String>) -> Result<Key, GraphError> {
    self.add_step_with(name, StepOptions::default())
  }

  /// Add a step. The first step added to a process becomes the start step;
  /// a start request on any later step is ignored.
  pub fn add_step_with(
    &mut self,
    name: impl Into<String>,
    options: StepOptions,
  ) -> Result<Key, GraphError> {
    let mut step = Step::new(self, name)?
      .with_start(options.is_start)
      .with_team_keys(options.teams)
      .with_members(options.members);
    if let Some(key) = options.key {
      step = step.with_key(key);
    }
    if let Some(description) = options.description {
      step = step.with_description(description);
    }
    self.insert_step(step)
  }

  /// Register a directly constructed step, replacing any step with the same
  /// key in place.
  pub fn insert_step(&mut self, mut step: Step) -> Result<Key, GraphError> {
    let key = require_key("step", step.key.clone())?;
    if step.process != self.key {
      return Err(GraphError::WrongProcess {
        entity: "step",
        key,
        owner: step.process,
        process: self.key.clone(),
      });
    }

    let is_start = match self.steps.get(&key) {
      Some(existing) => existing.is_start,
      None => self.steps.is_empty(),
    };
    if step.is_start && !is_start {
      tracing::debug!(
        process = %self.key,
        step = %key,
        "ignoring start flag, process already has a start step"
      );
    }
    step.is_start = is_start;

    tracing::debug!(process = %self.key, step = %key, name = %step.name, "added step");
    self.steps.insert(key.clone(), step);
    Ok(key)
  }

  /// Register a batch of stored steps, keeping the start flag each one
  /// carries instead of applying the first-added rule.
  ///
  /// After the batch is applied a non-empty process must have exactly one
  /// start step. Nothing is inserted when an error is returned.
  pub fn restore_steps<I>(&mut self, steps: I) -> Result<(), GraphError>
  where
    I: IntoIterator<Item = Step>,
  {
    let mut staged = self.steps.clone();
    for step in steps {
      let key = require_key("step", step.key.clone())?;
      if step.process != self.key {
        return Err(GraphError::WrongProcess {
          entity: "step",
          key,
          owner: step.process,
          process: self.key.clone(),
        });
      }
      staged.insert(key, step);
    }

    let starts = staged.values().filter(|s| s.is_start).count();
    if !staged.is_empty() && starts != 1 {
      return Err(GraphError::StartStep {
        process: self.key.clone(),
        starts,
      });
    }

    tracing::debug!(process = %self.key, steps = staged.len(), "restored steps");
    self.steps = staged;
    Ok(())
  }

  /// Register a directly constructed action, replacing any action with the
  /// same key in place.
  pub fn insert_action(&mut self, action: Action) -> Result<Key, GraphError> {
    let key = require_key("action", action.key.clone())?;
    if action.process != self.key {
      return Err(GraphError::WrongProcess {
        entity: "action",
        key,
        owner: action.process,
        process: self.key.clone(),
      });
    }

    tracing::debug!(process = %self.key, action = %key, name = %action.name, "added action");
    self.actions.insert(key.clone(), action);
    Ok(key)
  }

  /// First step named `name`, in insertion order.
  pub fn step_by_name(&self, name: &str) -> Option<&Step> {
    self.steps.values().find(|s| s.name == name)
  }

  /// Steps named `name`: the step itself when exactly one matches, otherwise
  /// the (possibly empty) list of matches.
  pub fn steps_by_name(&self, name: &str) -> StepMatch<'_> {
    let mut matches: Vec<&Step> = self.steps.values().filter(|s| s.name == name).collect();
    if matches.len() == 1 {
      return StepMatch::One(matches.remove(0));
    }
    StepMatch::Many(matches)
  }

  /// Remove every step named `name`.
  ///
  /// Actions that still list a removed step as incoming or outgoing are left
  /// as they are. If the start step is removed, the earliest remaining step
  /// takes over as start.
  pub fn delete_steps_by_name(&mut self, name: &str) -> Vec<Step> {
    let keys: Vec<Key> = self
      .steps
      .values()
      .filter(|s| s.name == name)
      .map(|s| s.key.clone())
      .collect();

    let removed: Vec<Step> = keys
      .iter()
      .filter_map(|k| self.steps.shift_remove(k))
      .collect();

    if removed.iter().any(|s| s.is_start)
      && let Some((key, first)) = self.steps.first_mut()
    {
      first.is_start = true;
      tracing::debug!(process = %self.key, step = %key, "promoted step to start");
    }

    tracing::debug!(
      process = %self.key,
      step = name,
      removed = removed.len(),
      "deleted steps"
    );
    removed
  }

  /// Actions whose incoming set contains `step`, optionally filtered by name.
  ///
  /// Linear in the number of actions.
  pub fn step_actions(&self, step: &Key, name: Option<&str>) -> Vec<&Action> {
    self
      .actions
      .values()
      .filter(|a| name.is_none_or(|n| a.name == n))
      .filter(|a| a.incoming.contains(step))
      .collect()
  }

  /// `(action, step)` pairs where an action still lists a step that is no
  /// longer part of the process, as left behind by step deletion.
  pub fn dangling_references(&self) -> Vec<(&Key, &Key)> {
    let steps = &self.steps;
    self
      .actions
      .values()
      .flat_map(move |a| {
        a.incoming
          .iter()
          .chain(a.outgoing.iter())
          .filter(move |step| !steps.contains_key(*step))
          .map(move |step| (&a.key, step))
      })
      .collect()
  }

  /// Render the process in DOT format.
  pub fn to_dot(&self) -> String {
    dot::render(self)
  }

  pub(crate) fn require_step(&self, key: &Key) -> Result<&Step, GraphError> {
    self.steps.get(key).ok_or_else(|| GraphError::UnknownStep {
      process: self.key.clone(),
      step: key.clone(),
    })
  }
}
