//! DOT rendering of a process.
//!
//! One node per step (id = step key, label = step name), a synthetic
//! `finish` sink, and one labelled edge per (incoming, target) pairing of
//! each action. Complete actions point at `finish`; an incomplete action
//! with no outgoing steps contributes no edges.

use std::fmt::Write;

use crate::process::Process;

/// Node id of the synthetic sink that terminal actions lead to.
pub const FINISH_NODE: &str = "finish";

pub(crate) fn render(process: &Process) -> String {
  let mut out = String::new();
  // Writing into a String cannot fail.
  let _ = writeln!(out, "digraph \"{}\" {{", escape(process.name()));

  for step in process.steps() {
    let _ = writeln!(
      out,
      "\"{}\" [label=\"{}\"]",
      escape(step.key().as_str()),
      escape(step.name())
    );
  }
  let _ = writeln!(out, "\"{FINISH_NODE}\" [label=\"Finish\"]");

  for action in process.actions() {
    let label = escape(action.name());
    for incoming in action.incoming() {
      let from = escape(incoming.as_str());
      if action.is_complete() {
        let _ = writeln!(out, "\"{from}\" -> \"{FINISH_NODE}\" [label=\"{label}\"]");
        continue;
      }
      for outgoing in action.outgoing() {
        let _ = writeln!(
          out,
          "\"{from}\" -> \"{}\" [label=\"{label}\"]",
          escape(outgoing.as_str())
        );
      }
    }
  }

  out.push('}');
  out
}

fn escape(value: &str) -> String {
  value.replace('\\', "\\\\").replace('"', "\\\"")
}
