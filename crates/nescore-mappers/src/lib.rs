//! Cartridge ROM parsing and mapper chip emulation.
//!
//! ```
//! use nescore_mappers::{create_mapper, Rom};
//!
//! let mut data = vec![b'N', b'E', b'S', 0x1A, 2, 1, 0, 0];
//! data.extend(std::iter::repeat(0).take(8));
//! data.extend(std::iter::repeat(0xEA).take(32 * 1024));
//! data.extend(std::iter::repeat(0).take(8 * 1024));
//!
//! let rom = Rom::load(&data).unwrap();
//! let mapper = create_mapper(&rom).unwrap();
//! assert_eq!(mapper.mapper_number(), 0);
//! ```
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod axrom;
mod cnrom;
mod gxrom;
mod mapper;
mod mirroring;
mod mmc1;
mod mmc3;
mod nrom;
mod rom;
mod uxrom;

pub use axrom::Axrom;
pub use cnrom::Cnrom;
pub use gxrom::Gxrom;
pub use mapper::Mapper;
pub use mirroring::Mirroring;
pub use mmc1::Mmc1;
pub use mmc3::Mmc3;
pub use nrom::Nrom;
pub use rom::{Rom, RomError, RomHeader};
pub use uxrom::Uxrom;

use alloc::boxed::Box;

/// Construct the appropriate [`Mapper`] implementation for a parsed ROM.
///
/// # Errors
///
/// Returns [`RomError::UnsupportedMapper`] if the ROM's mapper number isn't
/// one of the implemented families (0, 1, 2, 3, 4, 7, 66).
pub fn create_mapper(rom: &Rom) -> Result<Box<dyn Mapper>, RomError> {
    match rom.header.mapper_number {
        0 => Ok(Box::new(Nrom::new(rom))),
        1 => Ok(Box::new(Mmc1::new(rom))),
        2 => Ok(Box::new(Uxrom::new(rom))),
        3 => Ok(Box::new(Cnrom::new(rom))),
        4 => Ok(Box::new(Mmc3::new(rom))),
        7 => Ok(Box::new(Axrom::new(rom))),
        66 => Ok(Box::new(Gxrom::new(rom))),
        other => Err(RomError::UnsupportedMapper(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_rom(mapper_number: u16) -> Rom {
        // UxROM takes CHR-RAM only; every other family here accepts CHR-ROM.
        let chr_rom = if mapper_number == 2 { alloc::vec![] } else { alloc::vec![0u8; 8 * 1024] };

        Rom {
            header: RomHeader {
                prg_rom_size: 32 * 1024,
                chr_rom_size: chr_rom.len(),
                mapper_number,
                submapper: 0,
                mirroring: Mirroring::Horizontal,
                has_battery: false,
                has_trainer: false,
                nes2_format: false,
                prg_ram_size: 0,
                prg_nvram_size: 0,
                chr_ram_size: if chr_rom.is_empty() { 8 * 1024 } else { 0 },
                chr_nvram_size: 0,
            },
            trainer: None,
            prg_rom: alloc::vec![0u8; 32 * 1024],
            chr_rom,
        }
    }

    #[test]
    fn every_supported_mapper_number_dispatches() {
        for id in [0, 1, 2, 3, 4, 7, 66] {
            let rom = test_rom(id);
            let mapper = create_mapper(&rom).unwrap();
            assert_eq!(mapper.mapper_number(), id);
        }
    }

    #[test]
    fn unsupported_mapper_number_is_an_error() {
        let rom = test_rom(5);
        let err = create_mapper(&rom).unwrap_err();
        assert!(matches!(err, RomError::UnsupportedMapper(5)));
    }
}
