use thiserror::Error;

use crate::calculations::SolveError;
use crate::models::UnaryOp;

/// Failures surfaced by [`Calculator::apply`](crate::Calculator::apply).
///
/// A failed command leaves the buffer, registry and memory bank as they were.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CalcError {
    /// A compute request could not be solved.
    #[error(transparent)]
    Solve(#[from] SolveError),

    /// A unary function was applied outside its domain.
    #[error("{op} domain error for {value}")]
    Domain { op: UnaryOp, value: f64 },
}

/// What a renderer should do after a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Nothing visible changed.
    Unchanged,

    /// Show this text.
    Display(String),

    /// Briefly show `label`, then `then`.
    Transient { label: String, then: String },

    /// The calculator turned off; blank the display.
    Blank,

    /// The second-function indicator turned on or off.
    Shift(bool),

    /// The command failed.
    Failed(CalcError),
}

impl Effect {
    /// The text left on screen once any transient label has gone, if the
    /// effect changes it.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Display(text) => Some(text),
            Self::Transient { then, .. } => Some(then),
            Self::Blank => Some(""),
            Self::Unchanged | Self::Shift(_) | Self::Failed(_) => None,
        }
    }
}
