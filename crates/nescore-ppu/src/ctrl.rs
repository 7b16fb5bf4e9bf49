//! PPUCTRL ($2000).

use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    /// PPU control register flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct Ctrl: u8 {
        /// Base nametable select, low bit.
        const NAMETABLE_LO = 1 << 0;
        /// Base nametable select, high bit.
        const NAMETABLE_HI = 1 << 1;
        /// VRAM address increment per PPUDATA access (0: +1, 1: +32).
        const VRAM_INCREMENT = 1 << 2;
        /// Sprite pattern table address for 8x8 sprites.
        const SPRITE_PATTERN = 1 << 3;
        /// Background pattern table address.
        const BG_PATTERN = 1 << 4;
        /// Sprite size (0: 8x8, 1: 8x16).
        const SPRITE_SIZE = 1 << 5;
        /// PPU master/slave select, unused on NES.
        const MASTER_SLAVE = 1 << 6;
        /// Generate an NMI at the start of VBlank.
        const NMI_ENABLE = 1 << 7;
    }
}

impl Ctrl {
    /// Base nametable address selected by bits 0-1.
    #[must_use]
    pub const fn nametable_addr(self) -> u16 {
        0x2000 + 0x400 * (self.bits() & 0x03) as u16
    }

    /// Raw nametable select bits (0-3).
    #[must_use]
    pub const fn nametable_select(self) -> u8 {
        self.bits() & 0x03
    }

    /// VRAM address increment: 1 or 32.
    #[must_use]
    pub const fn vram_increment(self) -> u16 {
        if self.contains(Self::VRAM_INCREMENT) {
            32
        } else {
            1
        }
    }

    /// Pattern table base for 8x8 sprites.
    #[must_use]
    pub const fn sprite_pattern_addr(self) -> u16 {
        if self.contains(Self::SPRITE_PATTERN) {
            0x1000
        } else {
            0x0000
        }
    }

    /// Pattern table base for the background.
    #[must_use]
    pub const fn bg_pattern_addr(self) -> u16 {
        if self.contains(Self::BG_PATTERN) {
            0x1000
        } else {
            0x0000
        }
    }

    /// Whether sprites are 8x16.
    #[must_use]
    pub const fn sprite_size_16(self) -> bool {
        self.contains(Self::SPRITE_SIZE)
    }

    /// Sprite height in pixels.
    #[must_use]
    pub const fn sprite_height(self) -> u8 {
        if self.sprite_size_16() {
            16
        } else {
            8
        }
    }

    /// Whether VBlank NMI generation is enabled.
    #[must_use]
    pub const fn nmi_enabled(self) -> bool {
        self.contains(Self::NMI_ENABLE)
    }
}
