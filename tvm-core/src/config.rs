//! Tunable parameters for the solver and the entry state machine.
//!
//! Defaults reproduce the calculator's fixed behaviour; every field can be
//! overridden from a configuration file because all structs deserialize with
//! `#[serde(default)]`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest number of decimal places a solved value may be rounded to.
pub const MAX_RESULT_DECIMALS: u32 = 20;

/// Errors reported by [`SolverConfig::validate`] and [`CalculatorConfig::validate`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The Newton-Raphson starting rate must be finite and greater than -1.
    #[error("initial guess must be finite and greater than -1, got {0}")]
    InvalidInitialGuess(f64),

    /// At least one Newton-Raphson iteration is required.
    #[error("max iterations must be at least 1")]
    ZeroIterations,

    /// The convergence tolerance must be finite and positive.
    #[error("tolerance must be finite and positive, got {0}")]
    InvalidTolerance(f64),

    /// Rounding precision is limited by the decimal representation.
    #[error("result decimals must be at most {MAX_RESULT_DECIMALS}, got {0}")]
    TooManyDecimals(u32),

    /// The display must be able to show at least one character.
    #[error("display width must be at least 1")]
    ZeroDisplayWidth,
}

/// Parameters of the TVM solver.
///
/// # Example
///
/// ```
/// use tvm_core::SolverConfig;
///
/// let config = SolverConfig {
///     fail_on_divergence: true,
///     ..SolverConfig::default()
/// };
///
/// assert_eq!(config.max_iterations, 50);
/// assert_eq!(config.validate(), Ok(()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Starting periodic rate for the interest solver, as a fraction (0.05 = 5%).
    pub initial_guess: f64,

    /// Upper bound on Newton-Raphson steps.
    pub max_iterations: u32,

    /// Iteration stops once a step is smaller than this.
    pub tolerance: f64,

    /// Decimal places every solved value is rounded to.
    pub result_decimals: u32,

    /// When set, an interest solve that uses up `max_iterations` without
    /// meeting `tolerance` fails with
    /// [`SolveError::NoConvergence`](crate::SolveError::NoConvergence)
    /// instead of returning the last estimate.
    pub fail_on_divergence: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            initial_guess: 0.05,
            max_iterations: 50,
            tolerance: 1e-12,
            result_decimals: 10,
            fail_on_divergence: false,
        }
    }
}

impl SolverConfig {
    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - `initial_guess` is not finite or is at or below -1
    /// - `max_iterations` is zero
    /// - `tolerance` is not finite and positive
    /// - `result_decimals` exceeds [`MAX_RESULT_DECIMALS`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.initial_guess.is_finite() || self.initial_guess <= -1.0 {
            return Err(ConfigError::InvalidInitialGuess(self.initial_guess));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(ConfigError::InvalidTolerance(self.tolerance));
        }
        if self.result_decimals > MAX_RESULT_DECIMALS {
            return Err(ConfigError::TooManyDecimals(self.result_decimals));
        }
        Ok(())
    }
}

/// Parameters of a [`Calculator`](crate::Calculator) instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Maximum number of characters typed into the entry buffer.
    pub display_width: usize,

    pub solver: SolverConfig,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            display_width: 16,
            solver: SolverConfig::default(),
        }
    }
}

impl CalculatorConfig {
    /// Validates the display width and the nested solver configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display_width == 0 {
            return Err(ConfigError::ZeroDisplayWidth);
        }
        self.solver.validate()
    }
}
