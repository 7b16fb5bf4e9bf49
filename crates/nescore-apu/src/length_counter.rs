//! The length counter that silences a channel after a fixed number of half
//! frames unless halted.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lookup table from a 5-bit length index to its counter value.
pub const LENGTH_TABLE: [u8; 32] = [
    10, 254, 20, 2, 40, 4, 80, 6, 160, 8, 60, 10, 14, 12, 26, 14, 12, 16, 24, 18, 48, 20, 96, 22,
    192, 24, 72, 26, 16, 28, 32, 30,
];

/// Shared length-counter logic for every channel except the DMC.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LengthCounter {
    counter: u8,
    halt: bool,
    enabled: bool,
}

impl LengthCounter {
    /// A silenced, disabled length counter.
    #[must_use]
    pub const fn new() -> Self {
        Self { counter: 0, halt: false, enabled: false }
    }

    /// Load the counter from a 5-bit index written to the channel's length
    /// register (the top 5 bits of `$4003`/`$4007`/`$400B`/`$400F`).
    pub fn load(&mut self, index: u8) {
        if self.enabled {
            self.counter = LENGTH_TABLE[(index & 0x1F) as usize];
        }
    }

    /// Set the halt flag (shared with the envelope's loop flag on the same bit).
    pub fn set_halt(&mut self, halt: bool) {
        self.halt = halt;
    }

    /// Enable or disable the channel via `$4015`; disabling also silences it
    /// immediately.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.counter = 0;
        }
    }

    /// Clock the counter, called once per half frame.
    pub fn clock(&mut self) {
        if !self.halt && self.counter > 0 {
            self.counter -= 1;
        }
    }

    /// Whether the channel should currently produce sound.
    #[must_use]
    pub const fn active(&self) -> bool {
        self.counter > 0
    }

    /// Raw counter value, for `$4015` status reads.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.counter
    }

    /// Whether the channel is enabled via `$4015`.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabling_silences_immediately() {
        let mut lc = LengthCounter::new();
        lc.set_enabled(true);
        lc.load(0);
        assert!(lc.active());
        lc.set_enabled(false);
        assert!(!lc.active());
    }

    #[test]
    fn halt_prevents_clocking_down() {
        let mut lc = LengthCounter::new();
        lc.set_enabled(true);
        lc.set_halt(true);
        lc.load(0);
        let before = lc.value();
        lc.clock();
        assert_eq!(lc.value(), before);
    }

    #[test]
    fn clock_counts_down_to_zero() {
        let mut lc = LengthCounter::new();
        lc.set_enabled(true);
        lc.load(3); // LENGTH_TABLE[3] == 2
        lc.clock();
        assert!(lc.active());
        lc.clock();
        assert!(!lc.active());
    }
}
