//! PPUSTATUS ($2002).

use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    /// PPU status register flags. Bits 0-4 do not exist on hardware; reads
    /// return whatever was last latched on the open bus.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct Status: u8 {
        /// Sprite overflow (more than 8 sprites on a scanline).
        const SPRITE_OVERFLOW = 1 << 5;
        /// Sprite 0 hit.
        const SPRITE_ZERO_HIT = 1 << 6;
        /// In VBlank.
        const VBLANK = 1 << 7;
    }
}

impl Status {
    /// Whether the VBlank flag is set.
    #[must_use]
    pub const fn in_vblank(self) -> bool {
        self.contains(Self::VBLANK)
    }

    /// Whether sprite 0 hit has fired this frame.
    #[must_use]
    pub const fn sprite_zero_hit(self) -> bool {
        self.contains(Self::SPRITE_ZERO_HIT)
    }

    /// Whether sprite overflow has been flagged this frame.
    #[must_use]
    pub const fn sprite_overflow(self) -> bool {
        self.contains(Self::SPRITE_OVERFLOW)
    }

    /// Set or clear the VBlank flag.
    pub fn set_vblank(&mut self, value: bool) {
        self.set(Self::VBLANK, value);
    }

    /// Set or clear the sprite 0 hit flag.
    pub fn set_sprite_zero_hit(&mut self, value: bool) {
        self.set(Self::SPRITE_ZERO_HIT, value);
    }

    /// Set or clear the sprite overflow flag.
    pub fn set_sprite_overflow(&mut self, value: bool) {
        self.set(Self::SPRITE_OVERFLOW, value);
    }

    /// Compose the byte a $2002 read returns: bits 7-5 from the register,
    /// bits 4-0 from the open-bus latch.
    #[must_use]
    pub const fn read_with_open_bus(self, open_bus: u8) -> u8 {
        (self.bits() & 0xE0) | (open_bus & 0x1F)
    }
}
