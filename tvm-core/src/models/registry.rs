use serde::{Deserialize, Serialize};

use super::TvmVar;

/// Current values of the five TVM variables.
///
/// A variable stays unset until it is stored from the entry buffer or
/// produced by the solver. Only [`TvmRegistry::clear`] unsets it again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TvmRegistry {
    pub n: Option<f64>,
    pub i: Option<f64>,
    pub pv: Option<f64>,
    pub pmt: Option<f64>,
    pub fv: Option<f64>,
}

impl TvmRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, handy when assembling a known set of inputs.
    ///
    /// ```
    /// use tvm_core::{TvmRegistry, TvmVar};
    ///
    /// let registry = TvmRegistry::new()
    ///     .with(TvmVar::N, 10.0)
    ///     .with(TvmVar::I, 5.0);
    ///
    /// assert_eq!(registry.get(TvmVar::N), Some(10.0));
    /// assert_eq!(registry.get(TvmVar::Pv), None);
    /// ```
    pub fn with(
        mut self,
        var: TvmVar,
        value: f64,
    ) -> Self {
        self.set(var, value);
        self
    }

    pub fn get(
        &self,
        var: TvmVar,
    ) -> Option<f64> {
        *self.slot(var)
    }

    /// Overwrites `var` unconditionally.
    pub fn set(
        &mut self,
        var: TvmVar,
        value: f64,
    ) {
        *self.slot_mut(var) = Some(value);
    }

    /// Unsets every variable.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Returns the subset of `required` that has no value, in the given order.
    pub fn missing(
        &self,
        required: &[TvmVar],
    ) -> Vec<TvmVar> {
        required
            .iter()
            .copied()
            .filter(|var| self.get(*var).is_none())
            .collect()
    }

    fn slot(
        &self,
        var: TvmVar,
    ) -> &Option<f64> {
        match var {
            TvmVar::N => &self.n,
            TvmVar::I => &self.i,
            TvmVar::Pv => &self.pv,
            TvmVar::Pmt => &self.pmt,
            TvmVar::Fv => &self.fv,
        }
    }

    fn slot_mut(
        &mut self,
        var: TvmVar,
    ) -> &mut Option<f64> {
        match var {
            TvmVar::N => &mut self.n,
            TvmVar::I => &mut self.i,
            TvmVar::Pv => &mut self.pv,
            TvmVar::Pmt => &mut self.pmt,
            TvmVar::Fv => &mut self.fv,
        }
    }
}
