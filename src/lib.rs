//! Stepwise
//!
//! Approval-style business workflows modelled as directed graphs.
//!
//! - [`graph`]: processes, steps, actions and teams, plus DOT rendering
//! - [`wire`]: the canonical JSON encoding and its decoder
//! - [`client`]: the transport seam and a signed HTTP client for the
//!   remote store

pub use stepwise_client as client;
pub use stepwise_graph as graph;
pub use stepwise_wire as wire;

pub use stepwise_client::{Client, ClientConfig, ClientError, HttpTransport, Transport};
pub use stepwise_graph::{
  Action, ActionOptions, ActionUpdate, GraphError, Key, Process, Step, StepMatch, StepOptions,
  Team,
};
pub use stepwise_wire::{DecodeContext, Encode, WireError};
