use std::fmt;

use serde::{Deserialize, Serialize};

use super::TvmVar;

/// Binary arithmetic operators. Two operands and one operator are the most
/// that is ever live; there is no precedence, evaluation is left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operator {
    /// Evaluates `lhs <op> rhs` with plain IEEE-754 semantics: dividing by
    /// zero yields an infinity or NaN rather than an error.
    pub fn apply(
        self,
        lhs: f64,
        rhs: f64,
    ) -> f64 {
        match self {
            Self::Add => lhs + rhs,
            Self::Subtract => lhs - rhs,
            Self::Multiply => lhs * rhs,
            Self::Divide => lhs / rhs,
            Self::Power => lhs.powf(rhs),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Power => "^",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Single-operand keys applied immediately to the entry buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Percent,
    Sqrt,
    Square,
    Reciprocal,
    Ln,
}

impl UnaryOp {
    /// Applies the function, returning `None` when `value` is outside its
    /// domain (reciprocal of zero, logarithm of a non-positive number).
    ///
    /// The square root of a negative number is not rejected; it yields NaN,
    /// which the display shows as an error value.
    pub fn apply(
        self,
        value: f64,
    ) -> Option<f64> {
        match self {
            Self::Percent => Some(value / 100.0),
            Self::Sqrt => Some(value.sqrt()),
            Self::Square => Some(value * value),
            Self::Reciprocal if value == 0.0 => None,
            Self::Reciprocal => Some(1.0 / value),
            Self::Ln if value <= 0.0 => None,
            Self::Ln => Some(value.ln()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Percent => "%",
            Self::Sqrt => "SQRT",
            Self::Square => "X2",
            Self::Reciprocal => "1/X",
            Self::Ln => "LN",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A discrete keystroke consumed by [`Calculator::apply`](crate::Calculator::apply).
///
/// Translating physical keys or text into commands is the caller's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    PowerToggle,
    Shift,
    StorePending,
    RecallPending,
    /// A digit key, `0..=9`. Larger values are ignored by the calculator.
    Digit(u8),
    Dot,
    Unary(UnaryOp),
    Operator(Operator),
    Equals,
    SignToggle,
    Clear,
    ComputePending,
    VariableSelect(TvmVar),
    /// Unsets all five TVM variables.
    ClearTvm,
}
