//! Stepwise Graph
//!
//! The in-memory model of an approval workflow:
//! - [`Process`] is the graph container and owns its steps and actions
//! - [`Step`] is a node, optionally assigned to teams and members
//! - [`Action`] is a named edge from incoming steps to outgoing steps, or
//!   to the implicit finish sink when complete
//! - [`Team`] is a named group of members with its own lifetime
//!
//! Every entity is identified by a [`Key`]. Steps and actions refer back to
//! their process by key, never by ownership. All mutation is synchronous and
//! assumes a single writer.

mod action;
mod dot;
mod error;
mod key;
mod process;
mod step;
mod team;

pub use action::Action;
pub use dot::FINISH_NODE;
pub use error::GraphError;
pub use key::Key;
pub use process::{Process, StepMatch};
pub use step::{ActionOptions, ActionUpdate, Step, StepMut, StepOptions};
pub use team::Team;
