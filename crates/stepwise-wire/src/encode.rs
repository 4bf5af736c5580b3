use serde::Serialize;

use stepwise_graph::{Action, Process, Step, Team};

use crate::error::WireError;
use crate::record::{ActionRecord, Kind, ProcessRecord, StepRecord, TeamRecord};

/// Canonical encoding of a graph entity.
pub trait Encode {
  type Record: Serialize;

  /// Build the wire record.
  fn to_record(&self) -> Self::Record;

  /// Reject entities whose encoding could not be decoded again.
  fn check(&self) -> Result<(), WireError> {
    Ok(())
  }

  /// Encode as a JSON value.
  fn to_value(&self) -> Result<serde_json::Value, WireError> {
    self.check()?;
    Ok(serde_json::to_value(self.to_record())?)
  }

  /// Encode as a compact JSON string.
  fn to_json(&self) -> Result<String, WireError> {
    self.check()?;
    Ok(serde_json::to_string(&self.to_record())?)
  }

  fn to_json_pretty(&self) -> Result<String, WireError> {
    self.check()?;
    Ok(serde_json::to_string_pretty(&self.to_record())?)
  }
}

impl Encode for Team {
  type Record = TeamRecord;

  fn to_record(&self) -> TeamRecord {
    TeamRecord {
      kind: Kind::Team,
      key: self.key().clone(),
      name: self.name().to_string(),
      description: self.description().map(str::to_string),
      members: self.members().iter().cloned().collect(),
    }
  }
}

impl Encode for Step {
  type Record = StepRecord;

  fn to_record(&self) -> StepRecord {
    StepRecord {
      kind: Kind::Step,
      key: self.key().clone(),
      process: self.process_key().clone(),
      name: self.name().to_string(),
      description: self.description().map(str::to_string),
      is_start: self.is_start(),
      teams: self.teams().iter().cloned().collect(),
      members: self.members().iter().cloned().collect(),
    }
  }
}

impl Encode for Action {
  type Record = ActionRecord;

  fn to_record(&self) -> ActionRecord {
    ActionRecord {
      kind: Kind::Action,
      key: self.key().clone(),
      process: self.process_key().clone(),
      name: self.name().to_string(),
      is_complete: self.is_complete(),
      incoming: self.incoming().iter().cloned().collect(),
      outgoing: self.outgoing().iter().cloned().collect(),
    }
  }
}

impl Encode for Process {
  type Record = ProcessRecord;

  fn to_record(&self) -> ProcessRecord {
    ProcessRecord {
      kind: Kind::Process,
      key: self.key().clone(),
      name: self.name().to_string(),
      description: self.description().map(str::to_string),
      collect_stats: self.collect_stats(),
      steps: self.steps().map(|s| s.to_record()).collect(),
      actions: self.actions().map(|a| a.to_record()).collect(),
    }
  }

  /// Actions left pointing at deleted steps would fail to resolve on decode.
  fn check(&self) -> Result<(), WireError> {
    match self.dangling_references().first() {
      Some((action, step)) => Err(WireError::DanglingStep {
        process: self.key().clone(),
        action: (*action).clone(),
        step: (*step).clone(),
      }),
      None => Ok(()),
    }
  }
}
