//! Time-value-of-money solver.
//!
//! Derives any one of N, I, PV, PMT and FV from the other four using the
//! standard compound-interest identity. Cash flows follow the usual sign
//! convention: money paid out is negative, money received is positive.
//!
//! # Formulas
//!
//! With `i = I / 100` and `pmt = PMT` (zero when unset):
//!
//! | Target | Requires     | Method |
//! |--------|--------------|--------|
//! | FV     | N, I, PV     | `-(PV·(1+i)^N + pmt·((1+i)^N − 1)/i)` |
//! | PV     | N, I, FV     | `-(FV + pmt·((1+i)^N − 1)/i) / (1+i)^N` |
//! | PMT    | N, I, PV, FV | `-(FV + PV·(1+i)^N)·i / ((1+i)^N − 1)` |
//! | N      | I, PV, FV    | logarithm of the growth ratio |
//! | I      | N, PV, FV    | Newton-Raphson from the configured initial guess |
//!
//! Every result is rounded to [`SolverConfig::result_decimals`] places.
//!
//! # Example
//!
//! ```
//! use tvm_core::{TvmRegistry, TvmSolver, TvmVar};
//!
//! let registry = TvmRegistry::new()
//!     .with(TvmVar::N, 10.0)
//!     .with(TvmVar::I, 5.0)
//!     .with(TvmVar::Pv, -1000.0);
//!
//! let solver = TvmSolver::default();
//! let fv = solver.solve(TvmVar::Fv, &registry).unwrap();
//!
//! assert_eq!(fv, 1628.8946267774);
//! ```

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::calculations::common::round_to_decimals;
use crate::config::SolverConfig;
use crate::models::{TvmRegistry, TvmVar};

/// Errors that can occur while solving for a TVM variable.
///
/// None of them alter the registry: the solver only ever reads it.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SolveError {
    /// Required inputs have no value. PMT is never reported; it defaults to zero.
    #[error("missing input(s): {}", var_list(.0))]
    MissingVariable(Vec<TvmVar>),

    /// The cash-flow signs make the period-count logarithm undefined.
    #[error("invalid cash-flow signs: PV, PMT and FV cannot produce a period count")]
    InvalidSign,

    /// The computation produced NaN or an infinity.
    #[error("result is not a finite number ({0})")]
    NumericError(f64),

    /// The requested target is not one of N, I, PV, PMT, FV.
    #[error("unknown compute target '{0}'")]
    UnknownTarget(String),

    /// The interest solve ran out of iterations. Only raised when
    /// [`SolverConfig::fail_on_divergence`] is set.
    #[error("interest rate did not converge after {iterations} iterations (last estimate {last_rate}%)")]
    NoConvergence { iterations: u32, last_rate: f64 },
}

fn var_list(vars: &[TvmVar]) -> String {
    vars.iter()
        .map(TvmVar::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Solves for `target` with the default [`SolverConfig`].
pub fn solve(
    target: TvmVar,
    registry: &TvmRegistry,
) -> Result<f64, SolveError> {
    TvmSolver::default().solve(target, registry)
}

/// Stateless TVM solver parameterised by a [`SolverConfig`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TvmSolver {
    config: SolverConfig,
}

impl TvmSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Variables that must be set before `target` can be solved.
    pub fn required_inputs(target: TvmVar) -> &'static [TvmVar] {
        match target {
            TvmVar::Fv => &[TvmVar::N, TvmVar::I, TvmVar::Pv],
            TvmVar::Pv => &[TvmVar::N, TvmVar::I, TvmVar::Fv],
            TvmVar::Pmt => &[TvmVar::N, TvmVar::I, TvmVar::Pv, TvmVar::Fv],
            TvmVar::N => &[TvmVar::I, TvmVar::Pv, TvmVar::Fv],
            TvmVar::I => &[TvmVar::N, TvmVar::Pv, TvmVar::Fv],
        }
    }

    /// Computes `target` from the values in `registry`.
    ///
    /// The caller decides whether to write the result back.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError`] if:
    /// - a required input is unset (`MissingVariable`, nothing is computed)
    /// - the N derivation meets incompatible cash-flow signs (`InvalidSign`)
    /// - the result is NaN or infinite (`NumericError`)
    /// - the interest solve does not converge and the configuration asks
    ///   for that to be an error (`NoConvergence`)
    pub fn solve(
        &self,
        target: TvmVar,
        registry: &TvmRegistry,
    ) -> Result<f64, SolveError> {
        let missing = registry.missing(Self::required_inputs(target));
        if !missing.is_empty() {
            warn!(%target, ?missing, "compute request is missing inputs");
            return Err(SolveError::MissingVariable(missing));
        }

        let value = |var: TvmVar| registry.get(var).unwrap_or(0.0);
        let (n, pv, pmt, fv) = (
            value(TvmVar::N),
            value(TvmVar::Pv),
            value(TvmVar::Pmt),
            value(TvmVar::Fv),
        );
        let rate = value(TvmVar::I) / 100.0;
        debug!(%target, n, rate, pv, pmt, fv, "solving");

        let raw = match target {
            TvmVar::Fv => self.future_value(n, rate, pv, pmt),
            TvmVar::Pv => self.present_value(n, rate, pmt, fv),
            TvmVar::Pmt => self.payment(n, rate, pv, fv),
            TvmVar::N => self.periods(rate, pv, pmt, fv)?,
            TvmVar::I => self.interest_rate(n, pv, pmt, fv)?,
        };

        if !raw.is_finite() {
            warn!(%target, result = raw, "solver produced a non-finite result");
            return Err(SolveError::NumericError(raw));
        }

        Ok(round_to_decimals(raw, self.config.result_decimals))
    }

    /// Parses `target` as a key label and solves for it.
    ///
    /// ```
    /// use tvm_core::{SolveError, TvmRegistry, TvmSolver};
    ///
    /// let solver = TvmSolver::default();
    /// let result = solver.solve_named("APR", &TvmRegistry::new());
    ///
    /// assert_eq!(result, Err(SolveError::UnknownTarget("APR".to_string())));
    /// ```
    pub fn solve_named(
        &self,
        target: &str,
        registry: &TvmRegistry,
    ) -> Result<(TvmVar, f64), SolveError> {
        let var =
            TvmVar::parse(target).ok_or_else(|| SolveError::UnknownTarget(target.to_string()))?;
        self.solve(var, registry).map(|value| (var, value))
    }

    /// Future value of a present sum plus a payment stream.
    fn future_value(
        &self,
        n: f64,
        rate: f64,
        pv: f64,
        pmt: f64,
    ) -> f64 {
        -(pv * growth(rate, n) + pmt * annuity_factor(rate, n))
    }

    /// Present value that, with the payment stream, grows into `fv`.
    fn present_value(
        &self,
        n: f64,
        rate: f64,
        pmt: f64,
        fv: f64,
    ) -> f64 {
        -(fv + pmt * annuity_factor(rate, n)) / growth(rate, n)
    }

    /// Level payment that carries `pv` to `fv`.
    fn payment(
        &self,
        n: f64,
        rate: f64,
        pv: f64,
        fv: f64,
    ) -> f64 {
        let growth = growth(rate, n);
        -(fv + pv * growth) * rate / (growth - 1.0)
    }

    /// Number of periods.
    ///
    /// A single sum (`pmt == 0`) uses `-FV / PV` as the growth ratio. With a
    /// payment stream the ratio is `-(FV·i + pmt) / (PV·i + pmt)`.
    fn periods(
        &self,
        rate: f64,
        pv: f64,
        pmt: f64,
        fv: f64,
    ) -> Result<f64, SolveError> {
        let ratio = if pmt == 0.0 {
            let ratio = -fv / pv;
            if ratio <= 0.0 {
                warn!(pv, fv, "PV and FV must have opposite signs");
                return Err(SolveError::InvalidSign);
            }
            ratio
        } else {
            let numerator = -(fv * rate + pmt);
            let denominator = pv * rate + pmt;
            if denominator == 0.0 || numerator <= 0.0 {
                warn!(numerator, denominator, "annuity cash flows cannot produce N");
                return Err(SolveError::InvalidSign);
            }
            let ratio = numerator / denominator;
            if ratio <= 0.0 {
                warn!(ratio, "annuity growth ratio is not positive");
                return Err(SolveError::InvalidSign);
            }
            ratio
        };

        Ok(ratio.ln() / (1.0 + rate).ln())
    }

    /// Periodic interest rate, in percent, by Newton-Raphson.
    ///
    /// Stops early once a step is below the tolerance. Running out of
    /// iterations returns the last estimate unless
    /// [`SolverConfig::fail_on_divergence`] is set.
    ///
    /// The slope's payment term does not match the residual's derivative, so
    /// with a nonzero PMT the iteration runs to the cap. Set
    /// `fail_on_divergence` to get an error instead of that estimate.
    fn interest_rate(
        &self,
        n: f64,
        pv: f64,
        pmt: f64,
        fv: f64,
    ) -> Result<f64, SolveError> {
        let mut rate = self.config.initial_guess;

        for iteration in 1..=self.config.max_iterations {
            let step = rate_residual(rate, n, pv, pmt, fv) / rate_slope(rate, n, pv, pmt);
            rate -= step;
            trace!(iteration, rate, step, "newton step");

            if !rate.is_finite() {
                warn!(iteration, rate, "interest solve left the finite range");
                return Err(SolveError::NumericError(rate));
            }
            if step.abs() < self.config.tolerance {
                debug!(iterations = iteration, rate, "interest rate converged");
                return Ok(rate * 100.0);
            }
        }

        warn!(
            iterations = self.config.max_iterations,
            rate,
            "interest solve hit the iteration cap without converging"
        );
        if self.config.fail_on_divergence {
            return Err(SolveError::NoConvergence {
                iterations: self.config.max_iterations,
                last_rate: rate * 100.0,
            });
        }
        Ok(rate * 100.0)
    }
}

/// `(1 + rate)^n`
fn growth(
    rate: f64,
    n: f64,
) -> f64 {
    (1.0 + rate).powf(n)
}

/// `((1 + rate)^n - 1) / rate`; NaN when `rate` is zero.
fn annuity_factor(
    rate: f64,
    n: f64,
) -> f64 {
    (growth(rate, n) - 1.0) / rate
}

/// `f(r) = PV·(1+r)^N + pmt·((1+r)^N − 1)/r + FV`
fn rate_residual(
    rate: f64,
    n: f64,
    pv: f64,
    pmt: f64,
    fv: f64,
) -> f64 {
    pv * growth(rate, n) + pmt * annuity_factor(rate, n) + fv
}

/// `f'(r) = PV·N·(1+r)^(N−1) + pmt·(((1+r)^N − 1)/r² − N·(1+r)^(N−1)/r)`
fn rate_slope(
    rate: f64,
    n: f64,
    pv: f64,
    pmt: f64,
) -> f64 {
    let lagged = growth(rate, n - 1.0);
    pv * n * lagged + pmt * ((growth(rate, n) - 1.0) / rate.powi(2) - n * lagged / rate)
}
