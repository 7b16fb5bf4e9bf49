//! PPUMASK ($2001).

use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    /// PPU mask register flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct Mask: u8 {
        /// Greyscale output.
        const GREYSCALE = 1 << 0;
        /// Show background in the leftmost 8 pixels.
        const BG_LEFT = 1 << 1;
        /// Show sprites in the leftmost 8 pixels.
        const SPRITES_LEFT = 1 << 2;
        /// Enable background rendering.
        const BG_ENABLE = 1 << 3;
        /// Enable sprite rendering.
        const SPRITES_ENABLE = 1 << 4;
        /// Emphasize red.
        const EMPHASIZE_RED = 1 << 5;
        /// Emphasize green.
        const EMPHASIZE_GREEN = 1 << 6;
        /// Emphasize blue.
        const EMPHASIZE_BLUE = 1 << 7;
    }
}

impl Mask {
    /// Whether greyscale mode is on.
    #[must_use]
    pub const fn greyscale(self) -> bool {
        self.contains(Self::GREYSCALE)
    }

    /// Whether the background shows in columns 0-7.
    #[must_use]
    pub const fn bg_left_enabled(self) -> bool {
        self.contains(Self::BG_LEFT)
    }

    /// Whether sprites show in columns 0-7.
    #[must_use]
    pub const fn sprites_left_enabled(self) -> bool {
        self.contains(Self::SPRITES_LEFT)
    }

    /// Whether background rendering is on.
    #[must_use]
    pub const fn bg_enabled(self) -> bool {
        self.contains(Self::BG_ENABLE)
    }

    /// Whether sprite rendering is on.
    #[must_use]
    pub const fn sprites_enabled(self) -> bool {
        self.contains(Self::SPRITES_ENABLE)
    }

    /// Whether either layer renders (drives odd-frame skip and OAM decay).
    #[must_use]
    pub const fn rendering_enabled(self) -> bool {
        self.bg_enabled() || self.sprites_enabled()
    }

    /// Color emphasis bits (bits 5-7), as stored, for the host to apply.
    #[must_use]
    pub const fn emphasis(self) -> u8 {
        self.bits() >> 5
    }

    /// Apply greyscale masking to a palette index.
    #[must_use]
    pub const fn apply_greyscale(self, color: u8) -> u8 {
        if self.greyscale() {
            color & 0x30
        } else {
            color
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendering_enabled_is_either_layer() {
        assert!(!Mask::empty().rendering_enabled());
        assert!(Mask::BG_ENABLE.rendering_enabled());
        assert!(Mask::SPRITES_ENABLE.rendering_enabled());
    }

    #[test]
    fn greyscale_masks_to_grey_column() {
        assert_eq!(Mask::GREYSCALE.apply_greyscale(0x16), 0x10);
        assert_eq!(Mask::empty().apply_greyscale(0x16), 0x16);
    }
}
