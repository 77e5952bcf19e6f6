/// Number of addressable memory slots (keys 0-9).
pub const MEMORY_SLOTS: usize = 10;

/// Ten independent memory registers, all starting at zero.
///
/// Separate from the TVM registry: storing here never touches N, I, PV,
/// PMT or FV.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MemoryBank {
    slots: [f64; MEMORY_SLOTS],
}

impl MemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value in `slot`, or `None` if the index is out of range.
    pub fn get(
        &self,
        slot: usize,
    ) -> Option<f64> {
        self.slots.get(slot).copied()
    }

    /// Writes `value` into `slot`. Returns `false` if the index is out of range.
    pub fn set(
        &mut self,
        slot: usize,
        value: f64,
    ) -> bool {
        match self.slots.get_mut(slot) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }
}
