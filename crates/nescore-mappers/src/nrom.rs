//! Mapper 0: NROM.
//!
//! The simplest NES mapper: no bank switching. PRG-ROM is 16KB (mirrored to
//! fill the 32KB CPU window) or 32KB; CHR is a fixed 8KB of ROM or RAM.
//! Used by Super Mario Bros., Donkey Kong, Balloon Fight.

use crate::mapper::{Mapper, Mirroring};
use crate::rom::Rom;

/// NROM mapper implementation (Mapper 0).
#[derive(Debug, Clone)]
pub struct Nrom {
    prg_rom: Vec<u8>,
    chr_rom: Vec<u8>,
    chr_ram: Vec<u8>,
    mirroring: Mirroring,
    has_chr_ram: bool,
}

impl Nrom {
    /// Build an NROM mapper from a parsed ROM.
    ///
    /// # Panics
    ///
    /// Panics if PRG-ROM is not 16KB or 32KB, or CHR-ROM is present but not
    /// exactly 8KB.
    #[must_use]
    pub fn new(rom: &Rom) -> Self {
        assert!(
            rom.prg_rom.len() == 16384 || rom.prg_rom.len() == 32768,
            "NROM requires 16KB or 32KB PRG-ROM, got {} bytes",
            rom.prg_rom.len()
        );

        let has_chr_ram = rom.chr_rom.is_empty();
        let chr_ram = if has_chr_ram { vec![0; 8192] } else { Vec::new() };

        if !has_chr_ram {
            assert_eq!(rom.chr_rom.len(), 8192, "NROM requires 8KB CHR-ROM, got {} bytes", rom.chr_rom.len());
        }

        Self {
            prg_rom: rom.prg_rom.clone(),
            chr_rom: rom.chr_rom.clone(),
            chr_ram,
            mirroring: rom.header.mirroring,
            has_chr_ram,
        }
    }
}

impl Mapper for Nrom {
    fn read_prg(&self, addr: u16) -> u8 {
        if addr < 0x8000 {
            return 0;
        }
        let offset = (addr - 0x8000) as usize;
        let masked_offset = if self.prg_rom.len() == 16384 { offset & 0x3FFF } else { offset };
        self.prg_rom[masked_offset]
    }

    fn write_prg(&mut self, _addr: u16, _value: u8) {}

    fn read_chr(&self, addr: u16) -> u8 {
        if self.has_chr_ram { self.chr_ram[addr as usize] } else { self.chr_rom[addr as usize] }
    }

    fn write_chr(&mut self, addr: u16, value: u8) {
        if self.has_chr_ram {
            self.chr_ram[addr as usize] = value;
        }
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    fn mapper_number(&self) -> u16 {
        0
    }

    fn mapper_name(&self) -> &'static str {
        "NROM"
    }
}
