//! Canonical wire records.
//!
//! ```text
//! Process { kind:"Process", key, name, description|null, collect_stats, steps:[Step], actions:[Action] }
//! Team    { kind:"Team", key, name, description|null, members:[string] }
//! Step    { kind:"Step", key, process, name, description|null, is_start, teams:[key], members:[string] }
//! Action  { kind:"Action", key, process, name, is_complete, incoming:[key], outgoing:[key] }
//! ```
//!
//! Missing names and keys decode as empty strings so that they are reported
//! as validation failures rather than parse errors.

use std::fmt;

use serde::{Deserialize, Serialize};

use stepwise_graph::Key;

/// Entity tag carried by every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kind {
  Process,
  Team,
  Step,
  Action,
}

impl fmt::Display for Kind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Kind::Process => "Process",
      Kind::Team => "Team",
      Kind::Step => "Step",
      Kind::Action => "Action",
    };
    f.write_str(name)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecord {
  pub kind: Kind,
  #[serde(default)]
  pub key: Key,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub collect_stats: bool,
  #[serde(default)]
  pub steps: Vec<StepRecord>,
  #[serde(default)]
  pub actions: Vec<ActionRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
  pub kind: Kind,
  #[serde(default)]
  pub key: Key,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
  pub kind: Kind,
  #[serde(default)]
  pub key: Key,
  #[serde(default)]
  pub process: Key,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub is_start: bool,
  #[serde(default)]
  pub teams: Vec<Key>,
  #[serde(default)]
  pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
  pub kind: Kind,
  #[serde(default)]
  pub key: Key,
  #[serde(default)]
  pub process: Key,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub is_complete: bool,
  #[serde(default)]
  pub incoming: Vec<Key>,
  #[serde(default)]
  pub outgoing: Vec<Key>,
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_kind_serializes_as_tag() {
    assert_eq!(serde_json::to_value(Kind::Process).unwrap(), json!("Process"));
    let kind: Kind = serde_json::from_value(json!("Action")).unwrap();
    assert_eq!(kind, Kind::Action);
    assert!(serde_json::from_value::<Kind>(json!("Workflow")).is_err());
  }

  #[test]
  fn test_step_record_defaults() {
    let record: StepRecord = serde_json::from_value(json!({
      "kind": "Step",
      "key": "s-1",
      "process": "p-1",
      "name": "review"
    }))
    .unwrap();
    assert_eq!(record.description, None);
    assert!(!record.is_start);
    assert!(record.teams.is_empty());
    assert!(record.members.is_empty());
  }

  #[test]
  fn test_missing_name_decodes_empty() {
    let record: TeamRecord = serde_json::from_value(json!({
      "kind": "Team",
      "key": "t-1"
    }))
    .unwrap();
    assert!(record.name.is_empty());
  }
}
