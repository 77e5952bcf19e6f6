use tvm_core::{Calculator, CalculatorConfig, Command};

use crate::render::Renderer;
use crate::script::{ScriptError, parse_script};

/// A calculator paired with a renderer.
///
/// Feeds commands in and collects the display lines they produce, which is
/// all the `keys` subcommand and the integration tests need.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    calculator: Calculator,
    renderer: Renderer,
}

impl Session {
    pub fn new(config: CalculatorConfig) -> Self {
        let calculator = Calculator::new(config);
        let renderer = Renderer::new(calculator.config().display_width);
        Self {
            calculator,
            renderer,
        }
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    /// What the screen shows right now.
    pub fn screen(&self) -> String {
        self.renderer.screen(&self.calculator)
    }

    /// Applies commands in order and returns every line they print.
    pub fn press<I>(
        &mut self,
        commands: I,
    ) -> Vec<String>
    where
        I: IntoIterator<Item = Command>,
    {
        let mut lines = Vec::new();
        for command in commands {
            let effect = self.calculator.apply(command);
            lines.extend(self.renderer.render(&effect, &self.calculator));
        }
        lines
    }

    /// Parses and applies a keystroke script. Nothing is applied if the
    /// script does not parse.
    pub fn run_script(
        &mut self,
        script: &str,
    ) -> Result<Vec<String>, ScriptError> {
        let commands = parse_script(script)?;
        Ok(self.press(commands))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(CalculatorConfig::default())
    }
}
