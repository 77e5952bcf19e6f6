use crate::calculations::common::format_value;

/// The number being keyed in.
///
/// Holds the digit string that defines the numeric value, plus an optional
/// overlay: text shown in its place (a mode label such as `CPT`, or an
/// intermediate result) until the next edit. The overlay never changes
/// [`EntryBuffer::value`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryBuffer {
    digits: String,
    overlay: Option<String>,
    capacity: usize,
}

impl EntryBuffer {
    /// Creates a buffer reading `0` that accepts up to `capacity` typed characters.
    pub fn new(capacity: usize) -> Self {
        Self {
            digits: "0".to_string(),
            overlay: None,
            capacity,
        }
    }

    /// The text to display: the overlay if one is set, otherwise the digits.
    pub fn as_str(&self) -> &str {
        self.overlay.as_deref().unwrap_or(&self.digits)
    }

    /// Numeric value of the digits. Text that does not parse reads as NaN.
    pub fn value(&self) -> f64 {
        self.digits.parse().unwrap_or(f64::NAN)
    }

    /// Appends a digit. A lone `0`, an error value or a result in exponent
    /// form is replaced rather than extended. Returns `false` once the
    /// buffer is full.
    pub fn push_digit(
        &mut self,
        digit: u8,
    ) -> bool {
        let Some(ch) = char::from_digit(u32::from(digit), 10) else {
            return false;
        };
        self.begin_edit();
        if self.digits == "0" || !self.is_editable() {
            self.digits = ch.to_string();
            return true;
        }
        if self.digits.len() >= self.capacity {
            return false;
        }
        self.digits.push(ch);
        true
    }

    /// Appends a decimal point unless one is already present.
    pub fn push_dot(&mut self) -> bool {
        self.begin_edit();
        if !self.is_editable() {
            self.digits = "0.".to_string();
            return true;
        }
        if self.digits.contains('.') || self.digits.len() >= self.capacity {
            return false;
        }
        self.digits.push('.');
        true
    }

    /// Flips the leading minus sign. The literal `0` has no sign to flip.
    pub fn toggle_sign(&mut self) -> bool {
        if self.digits == "0" {
            return false;
        }
        self.overlay = None;
        match self.digits.strip_prefix('-') {
            Some(unsigned) => self.digits = unsigned.to_string(),
            None => self.digits.insert(0, '-'),
        }
        true
    }

    /// Replaces the contents with a computed value.
    pub fn set_value(
        &mut self,
        value: f64,
    ) {
        self.digits = format_value(value);
        self.overlay = None;
    }

    /// Back to a plain `0`.
    pub fn reset(&mut self) {
        self.digits = "0".to_string();
        self.overlay = None;
    }

    /// Shows `text` in place of the digits until the next edit.
    pub fn show(
        &mut self,
        text: impl Into<String>,
    ) {
        self.overlay = Some(text.into());
    }

    pub fn clear_overlay(&mut self) {
        self.overlay = None;
    }

    /// Plain finite digits can be extended; error values and exponent-form
    /// results cannot.
    fn is_editable(&self) -> bool {
        self.value().is_finite() && !self.digits.contains('e')
    }

    /// Typing over an overlay starts a fresh number.
    fn begin_edit(&mut self) {
        if self.overlay.take().is_some() {
            self.digits = "0".to_string();
        }
    }
}

impl Default for EntryBuffer {
    fn default() -> Self {
        Self::new(16)
    }
}
