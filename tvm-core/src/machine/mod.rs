//! Entry and mode state machine.

mod calculator;
mod effect;
mod entry;

pub use calculator::{COMPUTE_LABEL, Calculator, Modes, PendingOp};
pub use effect::{CalcError, Effect};
pub use entry::EntryBuffer;
