//! Stepwise Wire
//!
//! Canonical JSON encoding of workflow graphs and its inverse.
//!
//! Encoding goes through the [`Encode`] trait. Decoding goes through a
//! [`DecodeContext`], an explicit resolution scope for one decoding session:
//! step and action records name their process by key, and that key must
//! resolve to a process registered in the same context.

mod decode;
mod encode;
mod error;
mod record;

pub use decode::{DecodeContext, process_from_json, team_from_json};
pub use encode::Encode;
pub use error::WireError;
pub use record::{ActionRecord, Kind, ProcessRecord, StepRecord, TeamRecord};
