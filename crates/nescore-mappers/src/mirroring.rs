//! Nametable mirroring modes for the NES PPU.
//!
//! The PPU has 2KB of VRAM for nametables but needs 4KB to address four
//! logical nametables. Mirroring determines how the 2KB is mapped across
//! the four nametable addresses.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Nametable mirroring mode, selected by the cartridge's mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Mirroring {
    /// Horizontal mirroring (vertical arrangement): top row -> A, bottom -> B.
    #[default]
    Horizontal,
    /// Vertical mirroring (horizontal arrangement): left column -> A, right -> B.
    Vertical,
    /// Single-screen, all four nametables mapped to the first 1KB bank.
    SingleScreenLower,
    /// Single-screen, all four nametables mapped to the second 1KB bank.
    SingleScreenUpper,
    /// Four-screen: each nametable gets its own 1KB bank (needs 4KB VRAM).
    FourScreen,
}

impl Mirroring {
    /// Map a nametable address ($2000-$2FFF) to a physical VRAM offset.
    ///
    /// ```
    /// use nescore_mappers::Mirroring;
    ///
    /// let mirror = Mirroring::Horizontal;
    /// assert_eq!(mirror.map_address(0x2000), 0x0000);
    /// assert_eq!(mirror.map_address(0x2400), 0x0000);
    /// assert_eq!(mirror.map_address(0x2800), 0x0400);
    /// ```
    #[must_use]
    pub fn map_address(self, addr: u16) -> u16 {
        let addr = addr & 0x0FFF;
        let nametable = (addr >> 10) & 0x03;
        let offset = addr & 0x03FF;

        let bank = match self {
            Mirroring::Horizontal => match nametable {
                0 | 1 => 0,
                2 | 3 => 1,
                _ => unreachable!(),
            },
            Mirroring::Vertical => match nametable {
                0 | 2 => 0,
                1 | 3 => 1,
                _ => unreachable!(),
            },
            Mirroring::SingleScreenLower => 0,
            Mirroring::SingleScreenUpper => 1,
            Mirroring::FourScreen => nametable,
        };

        (bank << 10) | offset
    }

    /// Whether this mode requires the full 4KB of nametable VRAM.
    #[must_use]
    pub const fn is_four_screen(self) -> bool {
        matches!(self, Mirroring::FourScreen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_maps_rows_to_banks() {
        let mirror = Mirroring::Horizontal;
        assert_eq!(mirror.map_address(0x2000), 0x0000);
        assert_eq!(mirror.map_address(0x2400), 0x0000);
        assert_eq!(mirror.map_address(0x2800), 0x0400);
        assert_eq!(mirror.map_address(0x2C00), 0x0400);
    }

    #[test]
    fn vertical_maps_columns_to_banks() {
        let mirror = Mirroring::Vertical;
        assert_eq!(mirror.map_address(0x2000), 0x0000);
        assert_eq!(mirror.map_address(0x2800), 0x0000);
        assert_eq!(mirror.map_address(0x2400), 0x0400);
        assert_eq!(mirror.map_address(0x2C00), 0x0400);
    }

    #[test]
    fn four_screen_keeps_every_nametable_distinct() {
        let mirror = Mirroring::FourScreen;
        assert_eq!(mirror.map_address(0x2000), 0x0000);
        assert_eq!(mirror.map_address(0x2400), 0x0400);
        assert_eq!(mirror.map_address(0x2800), 0x0800);
        assert_eq!(mirror.map_address(0x2C00), 0x0C00);
    }

    #[test]
    fn addresses_above_2fff_are_masked() {
        let mirror = Mirroring::Horizontal;
        assert_eq!(mirror.map_address(0x3000), mirror.map_address(0x2000));
    }
}
