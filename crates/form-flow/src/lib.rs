//! Form interaction automaton.
//!
//! Fills heterogeneous input types, accumulates partial failures instead of
//! aborting, and submits only when the accumulated state is clean. Field
//! kinds are not part of the caller's contract: the markup is not under the
//! caller's control, so each field is classified at fill time by probing
//! the live element, then dispatched through a closed tagged variant.

mod classify;
mod model;
mod runner;
mod tempo;

pub use classify::classify;
pub use model::{FieldKind, FieldSpec, FormOptions, FormReport, ValidationReport};
pub use runner::FormRunner;
