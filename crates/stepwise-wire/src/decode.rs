use indexmap::IndexMap;

use stepwise_graph::{Action, GraphError, Key, Process, Step, Team};

use crate::error::WireError;
use crate::record::{ActionRecord, Kind, ProcessRecord, StepRecord, TeamRecord};

/// Resolution scope for one decoding session.
///
/// Processes and teams decoded (or registered) through a context are kept
/// here so that later step and action records can resolve their `process`
/// key. Contexts are independent of each other; nothing is shared globally.
#[derive(Debug, Default)]
pub struct DecodeContext {
  processes: IndexMap<Key, Process>,
  teams: IndexMap<Key, Team>,
}

impl DecodeContext {
  pub fn new() -> Self {
    Self::default()
  }

  /// Make an existing process resolvable, replacing one with the same key.
  pub fn register_process(&mut self, process: Process) -> &mut Process {
    let (index, _) = self.processes.insert_full(process.key().clone(), process);
    &mut self.processes[index]
  }

  /// Make an existing team resolvable, replacing one with the same key.
  pub fn register_team(&mut self, team: Team) -> &Team {
    let (index, _) = self.teams.insert_full(team.key().clone(), team);
    &self.teams[index]
  }

  pub fn process(&self, key: &Key) -> Option<&Process> {
    self.processes.get(key)
  }

  pub fn process_mut(&mut self, key: &Key) -> Option<&mut Process> {
    self.processes.get_mut(key)
  }

  pub fn team(&self, key: &Key) -> Option<&Team> {
    self.teams.get(key)
  }

  /// Remove a process from the scope and hand it back.
  pub fn take_process(&mut self, key: &Key) -> Option<Process> {
    self.processes.shift_remove(key)
  }

  /// Teams assigned to `step` that are known to this context. Unknown team
  /// keys are skipped.
  pub fn teams_of<'a>(&'a self, step: &'a Step) -> impl Iterator<Item = &'a Team> + 'a {
    step.teams().iter().filter_map(|key| self.teams.get(key))
  }

  /// Decode a process record and register the result.
  ///
  /// All steps are decoded before any action, so actions may refer to any
  /// step listed in the record regardless of order. Steps keep the
  /// `is_start` flag they were stored with; exactly one must carry it.
  pub fn decode_process(&mut self, record: ProcessRecord) -> Result<&mut Process, WireError> {
    expect_kind(Kind::Process, record.kind)?;

    let mut process = Process::with_key(record.key, record.name)?
      .with_collect_stats(record.collect_stats);
    process.set_description(record.description);

    let mut steps = Vec::with_capacity(record.steps.len());
    for step in record.steps {
      expect_kind(Kind::Step, step.kind)?;
      check_owner(&process, "step", &step.key, &step.process)?;
      steps.push(build_step(&process, step)?);
    }
    process.restore_steps(steps)?;

    for action in record.actions {
      expect_kind(Kind::Action, action.kind)?;
      check_owner(&process, "action", &action.key, &action.process)?;
      insert_action(&mut process, action)?;
    }

    tracing::debug!(
      process = %process.key(),
      steps = process.steps().count(),
      actions = process.actions().count(),
      "decoded process"
    );
    Ok(self.register_process(process))
  }

  /// Decode a step record into its already-registered process.
  ///
  /// The step is added like [`Process::add_step`]: it only becomes the
  /// start step when the process has no steps yet.
  pub fn decode_step(&mut self, record: StepRecord) -> Result<Key, WireError> {
    expect_kind(Kind::Step, record.kind)?;
    let process = self.resolve_process(&record.process)?;
    insert_step(process, record)
  }

  /// Decode an action record into its already-registered process.
  pub fn decode_action(&mut self, record: ActionRecord) -> Result<Key, WireError> {
    expect_kind(Kind::Action, record.kind)?;
    let process = self.resolve_process(&record.process)?;
    insert_action(process, record)
  }

  /// Decode a team record and register the result.
  pub fn decode_team(&mut self, record: TeamRecord) -> Result<&Team, WireError> {
    expect_kind(Kind::Team, record.kind)?;

    let mut team = Team::with_key(record.key, record.name)?.with_members(record.members);
    team.set_description(record.description);
    Ok(self.register_team(team))
  }

  /// Parse and decode a process from a JSON value.
  pub fn decode_process_value(
    &mut self,
    value: serde_json::Value,
  ) -> Result<&mut Process, WireError> {
    self.decode_process(serde_json::from_value(value)?)
  }

  /// Parse and decode a team from a JSON value.
  pub fn decode_team_value(&mut self, value: serde_json::Value) -> Result<&Team, WireError> {
    self.decode_team(serde_json::from_value(value)?)
  }

  fn resolve_process(&mut self, key: &Key) -> Result<&mut Process, WireError> {
    self
      .processes
      .get_mut(key)
      .ok_or_else(|| WireError::UnknownProcess(key.clone()))
  }
}

/// Decode a standalone process document with a fresh context.
pub fn process_from_json(json: &str) -> Result<Process, WireError> {
  let record: ProcessRecord = serde_json::from_str(json)?;
  let mut context = DecodeContext::new();
  let key = context.decode_process(record)?.key().clone();
  context
    .take_process(&key)
    .ok_or(WireError::UnknownProcess(key))
}

/// Decode a standalone team document.
pub fn team_from_json(json: &str) -> Result<Team, WireError> {
  let record: TeamRecord = serde_json::from_str(json)?;
  let mut context = DecodeContext::new();
  Ok(context.decode_team(record)?.clone())
}

fn expect_kind(expected: Kind, found: Kind) -> Result<(), WireError> {
  if expected != found {
    return Err(WireError::UnexpectedKind { expected, found });
  }
  Ok(())
}

/// Nested records must name the process they are nested in.
fn check_owner(
  process: &Process,
  entity: &'static str,
  key: &Key,
  owner: &Key,
) -> Result<(), WireError> {
  if owner.is_empty() {
    return Err(GraphError::EmptyKey { entity: "process" }.into());
  }
  if owner != process.key() {
    return Err(
      GraphError::WrongProcess {
        entity,
        key: key.clone(),
        owner: owner.clone(),
        process: process.key().clone(),
      }
      .into(),
    );
  }
  Ok(())
}

fn build_step(process: &Process, record: StepRecord) -> Result<Step, WireError> {
  let mut step = Step::new(process, record.name)?
    .with_key(record.key)
    .with_start(record.is_start)
    .with_team_keys(record.teams)
    .with_members(record.members);
  step.set_description(record.description);
  Ok(step)
}

fn insert_step(process: &mut Process, record: StepRecord) -> Result<Key, WireError> {
  let step = build_step(process, record)?;
  Ok(process.insert_step(step)?)
}

fn insert_action(process: &mut Process, record: ActionRecord) -> Result<Key, WireError> {
  let mut action = Action::new(process, record.name)?.with_key(record.key);
  action.set_complete(record.is_complete)?;

  for key in &record.incoming {
    action.add_incoming_step(resolve_step(process, key)?)?;
  }
  for key in &record.outgoing {
    action.add_outgoing_step(resolve_step(process, key)?)?;
  }

  Ok(process.insert_action(action)?)
}

fn resolve_step<'p>(process: &'p Process, key: &Key) -> Result<&'p Step, WireError> {
  process.step(key).ok_or_else(|| WireError::UnknownStep {
    process: process.key().clone(),
    step: key.clone(),
  })
}
