pub mod calculations;
pub mod config;
pub mod machine;
pub mod models;

pub use calculations::{SolveError, TvmSolver, solve};
pub use config::{CalculatorConfig, ConfigError, SolverConfig};
pub use machine::{CalcError, Calculator, Effect, EntryBuffer};
pub use models::*;
