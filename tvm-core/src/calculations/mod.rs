//! Time-value-of-money calculations.
//!
//! This module holds the solver and the rounding and formatting helpers it
//! shares with the entry state machine.

pub mod common;
pub mod tvm;

pub use tvm::{SolveError, TvmSolver, solve};
