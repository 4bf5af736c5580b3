//! End-to-end checks of the workflow graph contract.

use pretty_assertions::assert_eq;
use stepwise_graph::{ActionOptions, Key, Process, StepMatch, StepOptions, Team};
use stepwise_wire::{DecodeContext, Encode, WireError, process_from_json};

/// Process "P" with steps A -> B via "Approve", and B finishing via "Approve".
fn approval_process() -> Process {
  let mut process = Process::with_key("P", "P").unwrap();
  let a = process
    .add_step_with("A", StepOptions::default().key("A"))
    .unwrap();
  let b = process
    .add_step_with("B", StepOptions::default().key("B"))
    .unwrap();
  process
    .step_mut(&a)
    .unwrap()
    .add_action("Approve", ActionOptions::default().key("a-1").next_step(&b))
    .unwrap();
  process
    .step_mut(&b)
    .unwrap()
    .add_action("Approve", ActionOptions::default().key("a-2").complete())
    .unwrap();
  process
}

#[test]
fn test_dot_scenario() {
  let process = approval_process();
  assert_eq!(
    process.to_dot(),
    [
      "digraph \"P\" {",
      "\"A\" [label=\"A\"]",
      "\"B\" [label=\"B\"]",
      "\"finish\" [label=\"Finish\"]",
      "\"A\" -> \"B\" [label=\"Approve\"]",
      "\"B\" -> \"finish\" [label=\"Approve\"]",
      "}",
    ]
    .join("\n")
  );
}

#[test]
fn test_only_first_step_is_start() {
  let mut process = Process::new("onboarding").unwrap();
  let first = process
    .add_step_with("first", StepOptions::default().start(false))
    .unwrap();
  for name in ["second", "third", "fourth"] {
    process
      .add_step_with(name, StepOptions::default().start(true))
      .unwrap();
  }

  let starts: Vec<&Key> = process
    .steps()
    .filter(|s| s.is_start())
    .map(|s| s.key())
    .collect();
  assert_eq!(starts, vec![&first]);
}

#[test]
fn test_outgoing_always_clears_complete() {
  let mut process = approval_process();
  let a = Key::from("A");
  let finishing = Key::from("a-2");

  let step_a = process.step(&a).unwrap().clone();
  let action = process.action_mut(&finishing).unwrap();
  assert!(action.is_complete());
  action.add_outgoing_step(&step_a).unwrap();
  assert!(!action.is_complete());
}

#[test]
fn test_round_trip_law() {
  let team = Team::with_key("t-1", "finance").unwrap();
  let mut process = approval_process()
    .with_description("two stage approval")
    .with_collect_stats(true);
  process
    .step_mut(&Key::from("A"))
    .unwrap()
    .add_team(&team);

  let decoded = process_from_json(&process.to_json().unwrap()).unwrap();
  assert_eq!(decoded, process);
}

#[test]
fn test_decode_step_with_unregistered_process() {
  let process = approval_process();
  let step = process.step(&Key::from("A")).unwrap().to_record();
  let action = process.action(&Key::from("a-1")).unwrap().to_record();

  let mut context = DecodeContext::new();
  assert!(matches!(
    context.decode_step(step),
    Err(WireError::UnknownProcess(_))
  ));
  assert!(matches!(
    context.decode_action(action),
    Err(WireError::UnknownProcess(_))
  ));
}

#[test]
fn test_steps_by_name_return_shape() {
  let mut process = approval_process();
  assert!(matches!(process.steps_by_name("A"), StepMatch::One(step) if step.key().as_str() == "A"));
  assert!(matches!(process.steps_by_name("Z"), StepMatch::Many(ref v) if v.is_empty()));

  process.add_step("A").unwrap();
  assert!(matches!(process.steps_by_name("A"), StepMatch::Many(ref v) if v.len() == 2));
}

#[test]
fn test_delete_step_does_not_cascade() {
  let mut process = approval_process();
  let removed = process.delete_steps_by_name("B");
  assert_eq!(removed.len(), 1);
  assert!(process.step(&Key::from("B")).is_none());

  let b = Key::from("B");
  let into_b = process.action(&Key::from("a-1")).unwrap();
  assert!(into_b.outgoing().contains(&b));
  let from_b = process.action(&Key::from("a-2")).unwrap();
  assert!(from_b.incoming().contains(&b));

  // Orphaned references still render.
  assert!(process.to_dot().contains("\"B\" -> \"finish\" [label=\"Approve\"]"));
}

#[test]
fn test_team_equality_by_key() {
  let a = Team::with_key("same", "reviewers").unwrap();
  let b = Team::with_key("same", "approvers").unwrap();
  assert_eq!(a, b);

  let c = Team::with_key("one", "reviewers")
    .unwrap()
    .with_members(["x@example.com"]);
  let d = Team::with_key("two", "reviewers")
    .unwrap()
    .with_members(["x@example.com"]);
  assert_ne!(c, d);
}
