//! The keystroke state machine.
//!
//! A [`Calculator`] owns every piece of mutable state (entry buffer, pending
//! arithmetic, memory bank, TVM registry and mode flags) and advances it one
//! [`Command`] at a time. Compute requests are handed to a [`TvmSolver`];
//! the calculator never does TVM math itself.
//!
//! # Example
//!
//! ```
//! use tvm_core::{Calculator, Command, Effect, Operator};
//!
//! let mut calc = Calculator::default();
//! calc.apply(Command::Digit(7));
//! calc.apply(Command::Operator(Operator::Add));
//! calc.apply(Command::Digit(3));
//! calc.apply(Command::Operator(Operator::Multiply));
//! calc.apply(Command::Digit(2));
//!
//! assert_eq!(calc.apply(Command::Equals), Effect::Display("20".to_string()));
//! ```

use tracing::{debug, trace, warn};

use crate::calculations::TvmSolver;
use crate::calculations::common::format_value;
use crate::config::CalculatorConfig;
use crate::machine::{CalcError, Effect, EntryBuffer};
use crate::models::{Command, MemoryBank, Operator, TvmRegistry, TvmVar, UnaryOp};

/// Label shown while a compute request waits for its target.
pub const COMPUTE_LABEL: &str = "CPT";

/// A captured left operand and the operator waiting for its right operand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingOp {
    pub operand: f64,
    pub operator: Operator,
}

/// Input modes that change how the next keystroke is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modes {
    /// Second-function key pressed; cleared by any other keystroke.
    pub shift: bool,
    /// STO pressed; the next digit names the memory slot to write.
    pub store: bool,
    /// RCL pressed; the next digit (or TVM key) names what to read.
    pub recall: bool,
    /// CPT pressed; the next TVM key is solved instead of stored.
    pub compute: bool,
}

/// A single calculator instance.
///
/// Instances share nothing; create one per independent session.
#[derive(Debug, Clone, PartialEq)]
pub struct Calculator {
    config: CalculatorConfig,
    solver: TvmSolver,
    entry: EntryBuffer,
    registry: TvmRegistry,
    memory: MemoryBank,
    pending: Option<PendingOp>,
    modes: Modes,
    powered: bool,
}

impl Calculator {
    /// Creates a powered-on calculator showing `0`.
    ///
    /// The configuration is used as given; call
    /// [`CalculatorConfig::validate`] first when it comes from user input.
    pub fn new(config: CalculatorConfig) -> Self {
        Self {
            config,
            solver: TvmSolver::new(config.solver),
            entry: EntryBuffer::new(config.display_width),
            registry: TvmRegistry::new(),
            memory: MemoryBank::new(),
            pending: None,
            modes: Modes::default(),
            powered: true,
        }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Current display text. Empty while powered off.
    pub fn display(&self) -> &str {
        if self.powered { self.entry.as_str() } else { "" }
    }

    pub fn entry(&self) -> &EntryBuffer {
        &self.entry
    }

    pub fn registry(&self) -> &TvmRegistry {
        &self.registry
    }

    pub fn memory(&self) -> &MemoryBank {
        &self.memory
    }

    pub fn pending(&self) -> Option<PendingOp> {
        self.pending
    }

    pub fn modes(&self) -> Modes {
        self.modes
    }

    pub fn is_powered(&self) -> bool {
        self.powered
    }

    /// Applies one command and reports what the display should do.
    ///
    /// Power toggling is always honoured. While powered off every other
    /// command is ignored. Every consumed keystroke except the shift key
    /// itself clears the shift indicator.
    pub fn apply(
        &mut self,
        command: Command,
    ) -> Effect {
        trace!(?command, "apply");
        match command {
            Command::PowerToggle => self.toggle_power(),
            _ if !self.powered => Effect::Unchanged,
            Command::Shift => {
                self.modes.shift = !self.modes.shift;
                Effect::Shift(self.modes.shift)
            }
            other => {
                self.modes.shift = false;
                self.dispatch(other)
            }
        }
    }

    /// Applies commands in order, collecting their effects.
    pub fn apply_all<I>(
        &mut self,
        commands: I,
    ) -> Vec<Effect>
    where
        I: IntoIterator<Item = Command>,
    {
        commands.into_iter().map(|c| self.apply(c)).collect()
    }

    fn dispatch(
        &mut self,
        command: Command,
    ) -> Effect {
        match command {
            // Handled in `apply`.
            Command::PowerToggle | Command::Shift => Effect::Unchanged,
            Command::StorePending => {
                self.modes.store = true;
                Effect::Unchanged
            }
            Command::RecallPending => {
                self.modes.recall = true;
                Effect::Unchanged
            }
            Command::Digit(digit) => self.digit(digit),
            Command::Dot => {
                let changed = self.entry.push_dot();
                self.redraw_if(changed)
            }
            Command::Unary(op) => self.unary(op),
            Command::Operator(op) => self.operator(op),
            Command::Equals => self.equals(),
            Command::SignToggle => {
                let changed = self.entry.toggle_sign();
                self.redraw_if(changed)
            }
            Command::Clear => self.clear(),
            Command::ComputePending => {
                self.modes.compute = true;
                self.entry.show(COMPUTE_LABEL);
                self.redraw()
            }
            Command::VariableSelect(var) => self.variable(var),
            Command::ClearTvm => {
                debug!("clearing TVM registry");
                self.registry.clear();
                Effect::Unchanged
            }
        }
    }

    fn toggle_power(&mut self) -> Effect {
        self.powered = !self.powered;
        self.modes = Modes::default();
        self.pending = None;
        debug!(powered = self.powered, "power toggled");

        if self.powered {
            self.entry.reset();
            self.redraw()
        } else {
            Effect::Blank
        }
    }

    fn digit(
        &mut self,
        digit: u8,
    ) -> Effect {
        let slot = usize::from(digit);
        let Some(stored) = self.memory.get(slot) else {
            warn!(digit, "ignoring out-of-range digit");
            return Effect::Unchanged;
        };

        if self.modes.store {
            self.modes.store = false;
            let value = self.entry.value();
            self.memory.set(slot, value);
            debug!(slot, value, "stored to memory");
            return Effect::Unchanged;
        }
        if self.modes.recall {
            self.modes.recall = false;
            self.entry.set_value(stored);
            debug!(slot, value = stored, "recalled from memory");
            return self.redraw();
        }

        let changed = self.entry.push_digit(digit);
        self.redraw_if(changed)
    }

    fn unary(
        &mut self,
        op: UnaryOp,
    ) -> Effect {
        let value = self.entry.value();
        match op.apply(value) {
            Some(result) => {
                self.entry.set_value(result);
                self.redraw()
            }
            None => {
                warn!(%op, value, "unary function outside its domain");
                Effect::Failed(CalcError::Domain { op, value })
            }
        }
    }

    /// Captures the left operand, or evaluates the pending expression first
    /// and chains its result. The buffer restarts at `0` for the next operand
    /// while the display keeps showing the left operand.
    fn operator(
        &mut self,
        op: Operator,
    ) -> Effect {
        let rhs = self.entry.value();
        let (operand, shown) = match self.pending {
            Some(pending) => {
                let result = pending.operator.apply(pending.operand, rhs);
                trace!(lhs = pending.operand, operator = %pending.operator, rhs, result, "chained");
                (result, format_value(result))
            }
            None => (rhs, self.entry.as_str().to_string()),
        };

        self.pending = Some(PendingOp {
            operand,
            operator: op,
        });
        self.entry.reset();
        self.entry.show(shown);
        self.redraw()
    }

    fn equals(&mut self) -> Effect {
        let Some(pending) = self.pending.take() else {
            return Effect::Unchanged;
        };
        let rhs = self.entry.value();
        let result = pending.operator.apply(pending.operand, rhs);
        trace!(lhs = pending.operand, operator = %pending.operator, rhs, result, "evaluated");
        self.entry.set_value(result);
        self.redraw()
    }

    /// Resets the entry, pending arithmetic and mode flags. Power state,
    /// memory and the TVM registry survive.
    fn clear(&mut self) -> Effect {
        self.entry.reset();
        self.pending = None;
        self.modes = Modes::default();
        self.redraw()
    }

    fn variable(
        &mut self,
        var: TvmVar,
    ) -> Effect {
        if self.modes.compute {
            self.compute(var)
        } else if self.modes.recall {
            self.modes.recall = false;
            let value = self.registry.get(var).unwrap_or(0.0);
            self.entry.set_value(value);
            debug!(%var, value, "recalled variable");
            self.redraw()
        } else {
            let value = self.entry.value();
            self.registry.set(var, value);
            self.entry.reset();
            debug!(%var, value, "stored variable");
            Effect::Transient {
                label: format!("{var}={}", format_value(value)),
                then: self.entry.as_str().to_string(),
            }
        }
    }

    fn compute(
        &mut self,
        target: TvmVar,
    ) -> Effect {
        self.modes.compute = false;
        match self.solver.solve(target, &self.registry) {
            Ok(value) => {
                self.registry.set(target, value);
                self.entry.set_value(value);
                debug!(%target, value, "computed");
                self.redraw()
            }
            Err(error) => {
                self.entry.clear_overlay();
                warn!(%target, %error, "compute request failed");
                Effect::Failed(error.into())
            }
        }
    }

    fn redraw(&self) -> Effect {
        Effect::Display(self.entry.as_str().to_string())
    }

    fn redraw_if(
        &self,
        changed: bool,
    ) -> Effect {
        if changed { self.redraw() } else { Effect::Unchanged }
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(CalculatorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::SolveError;
    use crate::config::SolverConfig;

    /// Keys a number in digit by digit, with a trailing sign toggle for
    /// negative values.
    fn key_number(
        calc: &mut Calculator,
        text: &str,
    ) {
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        for ch in digits.chars() {
            let command = match ch {
                '.' => Command::Dot,
                d => Command::Digit(d.to_digit(10).unwrap() as u8),
            };
            calc.apply(command);
        }
        if negative {
            calc.apply(Command::SignToggle);
        }
    }

    fn store(
        calc: &mut Calculator,
        var: TvmVar,
        text: &str,
    ) {
        key_number(calc, text);
        calc.apply(Command::VariableSelect(var));
    }

    fn compute(
        calc: &mut Calculator,
        var: TvmVar,
    ) -> Effect {
        calc.apply(Command::ComputePending);
        calc.apply(Command::VariableSelect(var))
    }

    fn display(text: &str) -> Effect {
        Effect::Display(text.to_string())
    }

    // =========================================================================
    // Power tests
    // =========================================================================

    #[test]
    fn starts_powered_on_showing_zero() {
        let calc = Calculator::default();

        assert!(calc.is_powered());
        assert_eq!(calc.display(), "0");
    }

    #[test]
    fn power_off_blanks_and_ignores_input() {
        let mut calc = Calculator::default();

        assert_eq!(calc.apply(Command::PowerToggle), Effect::Blank);
        assert_eq!(calc.apply(Command::Digit(5)), Effect::Unchanged);
        assert_eq!(calc.apply(Command::Shift), Effect::Unchanged);
        assert_eq!(calc.display(), "");
        assert!(!calc.modes().shift);
    }

    #[test]
    fn power_on_resets_buffer_and_modes() {
        let mut calc = Calculator::default();
        key_number(&mut calc, "42");
        calc.apply(Command::Operator(Operator::Add));
        calc.apply(Command::StorePending);
        calc.apply(Command::ComputePending);

        calc.apply(Command::PowerToggle);
        let effect = calc.apply(Command::PowerToggle);

        assert_eq!(effect, display("0"));
        assert_eq!(calc.modes(), Modes::default());
        assert_eq!(calc.pending(), None);
    }

    #[test]
    fn power_cycle_keeps_memory_and_registry() {
        let mut calc = Calculator::default();
        key_number(&mut calc, "9");
        calc.apply(Command::StorePending);
        calc.apply(Command::Digit(1));
        store(&mut calc, TvmVar::N, "12");

        calc.apply(Command::PowerToggle);
        calc.apply(Command::PowerToggle);

        assert_eq!(calc.memory().get(1), Some(9.0));
        assert_eq!(calc.registry().get(TvmVar::N), Some(12.0));
    }

    // =========================================================================
    // Shift tests
    // =========================================================================

    #[test]
    fn shift_toggles_indicator() {
        let mut calc = Calculator::default();

        assert_eq!(calc.apply(Command::Shift), Effect::Shift(true));
        assert_eq!(calc.apply(Command::Shift), Effect::Shift(false));
    }

    #[test]
    fn shift_then_digit_clears_shift() {
        let mut calc = Calculator::default();
        calc.apply(Command::Shift);

        calc.apply(Command::Digit(3));

        assert!(!calc.modes().shift);
        assert_eq!(calc.display(), "3");
    }

    #[test]
    fn shift_is_cleared_by_non_digit_keys_too() {
        let mut calc = Calculator::default();
        calc.apply(Command::Shift);

        calc.apply(Command::Equals);

        assert!(!calc.modes().shift);
    }

    // =========================================================================
    // Entry tests
    // =========================================================================

    #[test]
    fn digits_and_dot_build_a_number() {
        let mut calc = Calculator::default();

        key_number(&mut calc, "3.14");

        assert_eq!(calc.display(), "3.14");
        assert_eq!(calc.entry().value(), 3.14);
    }

    #[test]
    fn second_dot_is_ignored() {
        let mut calc = Calculator::default();
        key_number(&mut calc, "1.5");

        assert_eq!(calc.apply(Command::Dot), Effect::Unchanged);
        assert_eq!(calc.display(), "1.5");
    }

    #[test]
    fn sign_toggle_on_zero_is_a_noop() {
        let mut calc = Calculator::default();

        assert_eq!(calc.apply(Command::SignToggle), Effect::Unchanged);
        assert_eq!(calc.display(), "0");
    }

    #[test]
    fn sign_toggle_negates_entry() {
        let mut calc = Calculator::default();
        key_number(&mut calc, "250");

        assert_eq!(calc.apply(Command::SignToggle), display("-250"));
    }

    #[test]
    fn out_of_range_digit_is_ignored() {
        let mut calc = Calculator::default();

        assert_eq!(calc.apply(Command::Digit(12)), Effect::Unchanged);
        assert_eq!(calc.display(), "0");
    }

    // =========================================================================
    // Unary function tests
    // =========================================================================

    #[test]
    fn unary_functions_rewrite_the_buffer() {
        let mut calc = Calculator::default();
        key_number(&mut calc, "8");

        assert_eq!(calc.apply(Command::Unary(UnaryOp::Reciprocal)), display("0.125"));
        assert_eq!(calc.apply(Command::Unary(UnaryOp::Percent)), display("0.00125"));
    }

    #[test]
    fn square_then_sqrt() {
        let mut calc = Calculator::default();
        key_number(&mut calc, "12");

        assert_eq!(calc.apply(Command::Unary(UnaryOp::Square)), display("144"));
        assert_eq!(calc.apply(Command::Unary(UnaryOp::Sqrt)), display("12"));
    }

    #[test]
    fn ln_of_non_positive_fails_without_touching_buffer() {
        let mut calc = Calculator::default();
        key_number(&mut calc, "-3");

        let effect = calc.apply(Command::Unary(UnaryOp::Ln));

        assert_eq!(
            effect,
            Effect::Failed(CalcError::Domain {
                op: UnaryOp::Ln,
                value: -3.0
            })
        );
        assert_eq!(calc.display(), "-3");
    }

    #[test]
    fn reciprocal_of_zero_fails() {
        let mut calc = Calculator::default();

        let effect = calc.apply(Command::Unary(UnaryOp::Reciprocal));

        assert!(matches!(effect, Effect::Failed(CalcError::Domain { .. })));
        assert_eq!(calc.display(), "0");
    }

    #[test]
    fn sqrt_of_negative_shows_nan() {
        let mut calc = Calculator::default();
        key_number(&mut calc, "-4");

        assert_eq!(calc.apply(Command::Unary(UnaryOp::Sqrt)), display("NaN"));
    }

    // =========================================================================
    // Arithmetic tests
    // =========================================================================

    #[test]
    fn arithmetic_chains_left_to_right() {
        let mut calc = Calculator::default();
        key_number(&mut calc, "7");
        calc.apply(Command::Operator(Operator::Add));
        key_number(&mut calc, "3");

        let chained = calc.apply(Command::Operator(Operator::Multiply));
        key_number(&mut calc, "2");
        let result = calc.apply(Command::Equals);

        assert_eq!(chained, display("10"));
        assert_eq!(result, display("20"));
        assert_eq!(calc.pending(), None);
    }

    #[test]
    fn operator_captures_operand_and_keeps_it_on_screen() {
        let mut calc = Calculator::default();
        key_number(&mut calc, "7");

        let effect = calc.apply(Command::Operator(Operator::Subtract));

        assert_eq!(effect, display("7"));
        assert_eq!(
            calc.pending(),
            Some(PendingOp {
                operand: 7.0,
                operator: Operator::Subtract
            })
        );
        assert_eq!(calc.entry().value(), 0.0);
    }

    #[test]
    fn power_operator_raises() {
        let mut calc = Calculator::default();
        key_number(&mut calc, "2");
        calc.apply(Command::Operator(Operator::Power));
        key_number(&mut calc, "10");

        assert_eq!(calc.apply(Command::Equals), display("1024"));
    }

    #[test]
    fn equals_without_pending_is_a_noop() {
        let mut calc = Calculator::default();
        key_number(&mut calc, "5");

        assert_eq!(calc.apply(Command::Equals), Effect::Unchanged);
        assert_eq!(calc.display(), "5");
    }

    #[test]
    fn divide_by_zero_shows_infinity() {
        let mut calc = Calculator::default();
        key_number(&mut calc, "1");
        calc.apply(Command::Operator(Operator::Divide));

        assert_eq!(calc.apply(Command::Equals), display("Infinity"));
    }

    #[test]
    fn typing_after_result_extends_it() {
        let mut calc = Calculator::default();
        key_number(&mut calc, "2");
        calc.apply(Command::Operator(Operator::Add));
        key_number(&mut calc, "3");
        calc.apply(Command::Equals);

        calc.apply(Command::Digit(1));

        assert_eq!(calc.display(), "51");
    }

    // =========================================================================
    // Clear tests
    // =========================================================================

    #[test]
    fn clear_resets_entry_pending_and_modes() {
        let mut calc = Calculator::default();
        key_number(&mut calc, "7");
        calc.apply(Command::Operator(Operator::Add));
        calc.apply(Command::StorePending);
        calc.apply(Command::RecallPending);
        calc.apply(Command::ComputePending);

        assert_eq!(calc.apply(Command::Clear), display("0"));
        assert_eq!(calc.pending(), None);
        assert_eq!(calc.modes(), Modes::default());
    }

    #[test]
    fn clear_keeps_memory_and_registry() {
        let mut calc = Calculator::default();
        key_number(&mut calc, "5");
        calc.apply(Command::StorePending);
        calc.apply(Command::Digit(0));
        store(&mut calc, TvmVar::Pv, "-1000");

        calc.apply(Command::Clear);

        assert_eq!(calc.memory().get(0), Some(5.0));
        assert_eq!(calc.registry().get(TvmVar::Pv), Some(-1000.0));
    }

    #[test]
    fn clear_is_idempotent() {
        let mut calc = Calculator::default();
        key_number(&mut calc, "12.5");
        calc.apply(Command::Operator(Operator::Divide));
        calc.apply(Command::Shift);

        calc.apply(Command::Clear);
        let once = calc.clone();
        calc.apply(Command::Clear);

        assert_eq!(calc, once);
    }

    // =========================================================================
    // Memory tests
    // =========================================================================

    #[test]
    fn store_writes_memory_without_touching_buffer() {
        let mut calc = Calculator::default();
        key_number(&mut calc, "42");

        calc.apply(Command::StorePending);
        let effect = calc.apply(Command::Digit(3));

        assert_eq!(effect, Effect::Unchanged);
        assert_eq!(calc.display(), "42");
        assert!(!calc.modes().store);
    }

    #[test]
    fn store_isolates_memory_slots_and_registry() {
        let mut calc = Calculator::default();
        let registry_before = *calc.registry();
        key_number(&mut calc, "42");

        calc.apply(Command::StorePending);
        calc.apply(Command::Digit(3));

        for slot in 0..crate::MEMORY_SLOTS {
            let expected = if slot == 3 { 42.0 } else { 0.0 };
            assert_eq!(calc.memory().get(slot), Some(expected));
        }
        assert_eq!(*calc.registry(), registry_before);
    }

    #[test]
    fn recall_reads_memory_into_buffer() {
        let mut calc = Calculator::default();
        key_number(&mut calc, "42");
        calc.apply(Command::StorePending);
        calc.apply(Command::Digit(3));
        calc.apply(Command::Clear);

        calc.apply(Command::RecallPending);
        let effect = calc.apply(Command::Digit(3));

        assert_eq!(effect, display("42"));
        assert!(!calc.modes().recall);
    }

    #[test]
    fn store_pending_survives_non_digit_commands() {
        let mut calc = Calculator::default();
        key_number(&mut calc, "6");
        calc.apply(Command::StorePending);

        calc.apply(Command::Equals);
        calc.apply(Command::SignToggle);

        assert!(calc.modes().store);
        calc.apply(Command::Digit(2));
        assert_eq!(calc.memory().get(2), Some(-6.0));
        assert!(!calc.modes().store);
    }

    #[test]
    fn store_pending_is_dropped_by_clear() {
        let mut calc = Calculator::default();
        calc.apply(Command::StorePending);

        calc.apply(Command::Clear);
        calc.apply(Command::Digit(2));

        assert!(!calc.modes().store);
        assert_eq!(calc.display(), "2");
        assert_eq!(calc.memory(), &MemoryBank::new());
    }

    // =========================================================================
    // TVM variable tests
    // =========================================================================

    #[test]
    fn variable_select_stores_and_resets_buffer() {
        let mut calc = Calculator::default();
        key_number(&mut calc, "-1000");

        let effect = calc.apply(Command::VariableSelect(TvmVar::Pv));

        assert_eq!(
            effect,
            Effect::Transient {
                label: "PV=-1000".to_string(),
                then: "0".to_string()
            }
        );
        assert_eq!(calc.registry().get(TvmVar::Pv), Some(-1000.0));
        assert_eq!(calc.display(), "0");
    }

    #[test]
    fn compute_pending_shows_label() {
        let mut calc = Calculator::default();

        assert_eq!(calc.apply(Command::ComputePending), display(COMPUTE_LABEL));
        assert!(calc.modes().compute);
    }

    #[test]
    fn compute_future_value() {
        let mut calc = Calculator::default();
        store(&mut calc, TvmVar::N, "10");
        store(&mut calc, TvmVar::I, "5");
        store(&mut calc, TvmVar::Pv, "-1000");
        store(&mut calc, TvmVar::Pmt, "0");

        let effect = compute(&mut calc, TvmVar::Fv);

        assert_eq!(effect, display("1628.8946267774"));
        assert_eq!(calc.registry().get(TvmVar::Fv), Some(1628.8946267774));
        assert!(!calc.modes().compute);
    }

    #[test]
    fn compute_interest_rate() {
        let mut calc = Calculator::default();
        store(&mut calc, TvmVar::N, "10");
        store(&mut calc, TvmVar::Pv, "-1000");
        store(&mut calc, TvmVar::Fv, "1628.8946268");

        compute(&mut calc, TvmVar::I);

        let rate = calc.registry().get(TvmVar::I).unwrap();
        assert!((rate - 5.0).abs() < 1e-6);
        assert_eq!(calc.entry().value(), rate);
    }

    #[test]
    fn compute_with_missing_inputs_leaves_state_alone() {
        let mut calc = Calculator::default();
        store(&mut calc, TvmVar::N, "10");
        key_number(&mut calc, "77");
        let registry_before = *calc.registry();

        let effect = compute(&mut calc, TvmVar::Fv);

        assert_eq!(
            effect,
            Effect::Failed(CalcError::Solve(SolveError::MissingVariable(vec![
                TvmVar::I,
                TvmVar::Pv
            ])))
        );
        assert_eq!(*calc.registry(), registry_before);
        assert_eq!(calc.display(), "77");
        assert!(!calc.modes().compute);
    }

    #[test]
    fn compute_with_matching_signs_reports_invalid_sign() {
        let mut calc = Calculator::default();
        store(&mut calc, TvmVar::I, "5");
        store(&mut calc, TvmVar::Pv, "1000");
        store(&mut calc, TvmVar::Fv, "1000");

        let effect = compute(&mut calc, TvmVar::N);

        assert_eq!(
            effect,
            Effect::Failed(CalcError::Solve(SolveError::InvalidSign))
        );
        assert_eq!(calc.registry().get(TvmVar::N), None);
    }

    #[test]
    fn compute_numeric_error_keeps_registry() {
        let mut calc = Calculator::default();
        store(&mut calc, TvmVar::N, "10");
        store(&mut calc, TvmVar::I, "0");
        store(&mut calc, TvmVar::Pv, "-1000");

        let effect = compute(&mut calc, TvmVar::Fv);

        assert!(matches!(
            effect,
            Effect::Failed(CalcError::Solve(SolveError::NumericError(_)))
        ));
        assert_eq!(calc.registry().get(TvmVar::Fv), None);
        assert_eq!(calc.display(), "0");
    }

    #[test]
    fn machine_stays_responsive_after_failure() {
        let mut calc = Calculator::default();
        compute(&mut calc, TvmVar::Pmt);

        key_number(&mut calc, "3");

        assert_eq!(calc.display(), "3");
    }

    #[test]
    fn compute_uses_configured_solver() {
        let mut calc = Calculator::new(CalculatorConfig {
            solver: SolverConfig {
                result_decimals: 2,
                ..SolverConfig::default()
            },
            ..CalculatorConfig::default()
        });
        store(&mut calc, TvmVar::N, "10");
        store(&mut calc, TvmVar::I, "5");
        store(&mut calc, TvmVar::Pv, "-1000");

        assert_eq!(compute(&mut calc, TvmVar::Fv), display("1628.89"));
    }

    #[test]
    fn recall_variable_loads_registry_value() {
        let mut calc = Calculator::default();
        store(&mut calc, TvmVar::Pmt, "-100");

        calc.apply(Command::RecallPending);
        let effect = calc.apply(Command::VariableSelect(TvmVar::Pmt));

        assert_eq!(effect, display("-100"));
        assert_eq!(calc.registry().get(TvmVar::Pmt), Some(-100.0));
    }

    #[test]
    fn recall_unset_variable_reads_zero() {
        let mut calc = Calculator::default();
        key_number(&mut calc, "9");

        calc.apply(Command::RecallPending);
        let effect = calc.apply(Command::VariableSelect(TvmVar::Fv));

        assert_eq!(effect, display("0"));
        assert_eq!(calc.registry().get(TvmVar::Fv), None);
    }

    #[test]
    fn clear_tvm_unsets_registry_only() {
        let mut calc = Calculator::default();
        store(&mut calc, TvmVar::N, "10");
        key_number(&mut calc, "8");

        calc.apply(Command::ClearTvm);

        assert_eq!(*calc.registry(), TvmRegistry::new());
        assert_eq!(calc.display(), "8");
    }

    #[test]
    fn instances_do_not_share_state() {
        let mut first = Calculator::default();
        let second = Calculator::default();

        store(&mut first, TvmVar::N, "10");

        assert_eq!(second.registry().get(TvmVar::N), None);
    }

    #[test]
    fn apply_all_returns_one_effect_per_command() {
        let mut calc = Calculator::default();

        let effects = calc.apply_all([Command::Digit(1), Command::Dot, Command::Dot]);

        assert_eq!(effects, vec![display("1"), display("1."), Effect::Unchanged]);
    }
}
