//! Calculator configuration files.
//!
//! The file is TOML. Every key is optional and falls back to the built-in
//! default:
//!
//! ```toml
//! display_width = 16
//!
//! [solver]
//! initial_guess = 0.05
//! max_iterations = 50
//! tolerance = 1e-12
//! result_decimals = 10
//! fail_on_divergence = false
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;
use tvm_core::CalculatorConfig;

/// Parses and validates configuration text.
pub fn parse_config(text: &str) -> Result<CalculatorConfig> {
    let config: CalculatorConfig = toml::from_str(text).context("invalid configuration TOML")?;
    config
        .validate()
        .context("configuration values are out of range")?;
    Ok(config)
}

/// Reads the configuration at `path`, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<CalculatorConfig> {
    let Some(path) = path else {
        return Ok(CalculatorConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config =
        parse_config(&text).with_context(|| format!("failed to load config {}", path.display()))?;
    debug!(path = %path.display(), ?config, "configuration loaded");
    Ok(config)
}
