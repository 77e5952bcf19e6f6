//! Command-line front end for the TVM calculator.
//!
//! The core library consumes abstract commands and produces abstract
//! effects; this crate supplies the outer layers: keystroke scripts, a text
//! display, configuration files, CSV batch solving and logging.

pub mod batch;
pub mod config;
pub mod logging;
pub mod render;
pub mod script;
pub mod session;

pub use batch::{ScenarioLoader, ScenarioLoaderError, ScenarioOutcome, ScenarioRecord};
pub use render::Renderer;
pub use script::{ScriptError, parse_script, parse_token};
pub use session::Session;
