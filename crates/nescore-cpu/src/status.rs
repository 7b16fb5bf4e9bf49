//! CPU status register (P).
//!
//! Bit layout: `N V U B D I Z C`. The unused bit (U) is always read back as
//! 1; the break bit (B) only exists on the value pushed to the stack, never
//! in the live register.

use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    /// 6502 processor status flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct Status: u8 {
        /// Carry.
        const CARRY = 1 << 0;
        /// Zero.
        const ZERO = 1 << 1;
        /// Interrupt disable.
        const IRQ_DISABLE = 1 << 2;
        /// Decimal mode (unused on NES, but preserved for register fidelity).
        const DECIMAL = 1 << 3;
        /// Break (stack image only).
        const BREAK = 1 << 4;
        /// Unused, always set on the live register.
        const UNUSED = 1 << 5;
        /// Overflow.
        const OVERFLOW = 1 << 6;
        /// Negative.
        const NEGATIVE = 1 << 7;
    }
}

/// The value of P immediately after RESET: interrupts disabled, unused bit set.
pub const POWER_ON: Status = Status::from_bits_truncate(Status::IRQ_DISABLE.bits() | Status::UNUSED.bits());

/// Mask applied when PLP/RTI pull P off the stack: B and U are not register bits.
const PULL_MASK: u8 = !(Status::BREAK.bits());

impl Status {
    /// Set Z and N from a computed byte value.
    #[inline]
    pub fn set_zn(&mut self, value: u8) {
        self.set(Status::ZERO, value == 0);
        self.set(Status::NEGATIVE, value & 0x80 != 0);
    }

    /// Set or clear an arbitrary flag.
    #[inline]
    pub fn set_flag(&mut self, flag: Status, value: bool) {
        self.set(flag, value);
    }

    /// Render the byte pushed to the stack by PHP/BRK/IRQ/NMI.
    ///
    /// `brk` selects whether the B flag is set (software BRK/PHP) or clear
    /// (hardware IRQ/NMI).
    #[must_use]
    pub const fn to_stack_byte(self, brk: bool) -> u8 {
        let base = self.bits() | Status::UNUSED.bits();
        if brk {
            base | Status::BREAK.bits()
        } else {
            base & !Status::BREAK.bits()
        }
    }

    /// Reconstruct P from a stack byte (PLP/RTI): B and the unused bit are
    /// not part of the live register and are discarded.
    #[must_use]
    pub const fn from_stack_byte(value: u8) -> Self {
        Status::from_bits_truncate((value & PULL_MASK) | Status::UNUSED.bits())
    }
}
