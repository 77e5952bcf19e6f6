use tvm_core::calculations::common::{format_value, round_to_decimals};
use tvm_core::{Calculator, Effect};

/// Text prefixed to the display while the second-function key is active.
pub const SHIFT_MARKER: &str = "[2ND]";

/// Turns calculator effects into display lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    width: usize,
}

impl Renderer {
    /// A renderer that shows at most `width` characters of the value.
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    /// The first `width` characters of `text`.
    pub fn truncate<'a>(
        &self,
        text: &'a str,
    ) -> &'a str {
        match text.char_indices().nth(self.width) {
            Some((end, _)) => &text[..end],
            None => text,
        }
    }

    /// Fits display text into `width` characters.
    ///
    /// Numbers keep their magnitude: fraction digits are rounded away first,
    /// then exponent form is used with as many mantissa digits as fit. Any
    /// other text is cut.
    pub fn fit(
        &self,
        text: &str,
    ) -> String {
        if text.chars().count() <= self.width {
            return text.to_string();
        }
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => self
                .fit_fixed(value)
                .or_else(|| self.fit_exponent(value))
                .unwrap_or_else(|| self.truncate(text).to_string()),
            _ => self.truncate(text).to_string(),
        }
    }

    /// What the screen shows right now.
    pub fn screen(
        &self,
        calculator: &Calculator,
    ) -> String {
        self.line(calculator.display(), calculator.modes().shift)
    }

    /// Lines to print for one effect. A transient label gets its own line
    /// before the screen it gives way to.
    pub fn render(
        &self,
        effect: &Effect,
        calculator: &Calculator,
    ) -> Vec<String> {
        let mut lines = Vec::new();
        match effect {
            Effect::Transient { label, .. } => lines.push(self.truncate(label).to_string()),
            Effect::Shift(_) => lines.push(self.screen(calculator)),
            Effect::Failed(err) => lines.push(format!("Error: {err}")),
            Effect::Unchanged | Effect::Display(_) | Effect::Blank => {}
        }
        if let Some(text) = effect.text() {
            lines.push(self.line(text, calculator.modes().shift));
        }
        lines
    }

    fn line(
        &self,
        text: &str,
        shift: bool,
    ) -> String {
        let value = self.fit(text);
        if shift {
            format!("{SHIFT_MARKER} {value}")
        } else {
            value
        }
    }

    /// Plain decimal form with the fraction rounded to fit, if the integer
    /// part fits and something significant survives the rounding.
    fn fit_fixed(
        &self,
        value: f64,
    ) -> Option<String> {
        let sign = usize::from(value.is_sign_negative());
        let integer_len = format!("{:.0}", value.abs().trunc()).len();
        // Room left after the sign, the integer part and the point.
        let decimals = self.width.checked_sub(sign + integer_len + 1)?;
        let rounded = round_to_decimals(value, u32::try_from(decimals).ok()?);
        if rounded == 0.0 {
            return None;
        }
        let text = format_value(rounded);
        (text.chars().count() <= self.width && !text.contains('e')).then_some(text)
    }

    /// Exponent form with the longest mantissa that fits.
    fn fit_exponent(
        &self,
        value: f64,
    ) -> Option<String> {
        (0..=16).rev().find_map(|precision| {
            let text = format!("{value:.precision$e}");
            let (mantissa, exponent) = text.split_once('e')?;
            let mantissa = if mantissa.contains('.') {
                mantissa.trim_end_matches('0').trim_end_matches('.')
            } else {
                mantissa
            };
            let text = format!("{mantissa}e{exponent}");
            (text.chars().count() <= self.width).then_some(text)
        })
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(16)
    }
}
