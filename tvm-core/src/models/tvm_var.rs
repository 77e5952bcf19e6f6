use std::fmt;

use serde::{Deserialize, Serialize};

/// The five time-value-of-money variables.
///
/// `I` is the periodic interest rate expressed as a percentage, so `5.0`
/// means 5% per period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TvmVar {
    N,
    I,
    Pv,
    Pmt,
    Fv,
}

impl TvmVar {
    /// Every variable, in keypad order.
    pub const ALL: [TvmVar; 5] = [Self::N, Self::I, Self::Pv, Self::Pmt, Self::Fv];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::N => "N",
            Self::I => "I",
            Self::Pv => "PV",
            Self::Pmt => "PMT",
            Self::Fv => "FV",
        }
    }

    /// Parses a key label, ignoring case. `I/Y` is accepted for `I`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "N" => Some(Self::N),
            "I" | "I/Y" => Some(Self::I),
            "PV" => Some(Self::Pv),
            "PMT" => Some(Self::Pmt),
            "FV" => Some(Self::Fv),
            _ => None,
        }
    }
}

impl fmt::Display for TvmVar {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
