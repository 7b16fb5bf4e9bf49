//! The `Mapper` trait all cartridge mappers implement.

pub use crate::mirroring::Mirroring;

/// A cartridge mapper: handles PRG/CHR banking, mirroring, and optional IRQ
/// generation.
pub trait Mapper: Send + Sync {
    /// Read a byte from PRG memory ($6000-$FFFF).
    fn read_prg(&self, addr: u16) -> u8;

    /// Write a byte to PRG memory ($6000-$FFFF): PRG-RAM or mapper registers.
    fn write_prg(&mut self, addr: u16, val: u8);

    /// Read a byte from CHR memory ($0000-$1FFF).
    fn read_chr(&self, addr: u16) -> u8;

    /// Write a byte to CHR memory; only has an effect when CHR is RAM.
    fn write_chr(&mut self, addr: u16, val: u8);

    /// Current nametable mirroring mode.
    fn mirroring(&self) -> Mirroring;

    /// Whether the mapper has a pending IRQ (MMC3's scanline counter).
    fn irq_pending(&self) -> bool {
        false
    }

    /// Acknowledge and clear a pending IRQ.
    fn irq_acknowledge(&mut self) {}

    /// Notify the mapper of a PPU scanline boundary, for scanline-counting
    /// IRQ mappers.
    fn scanline(&mut self) {}

    /// Notify the mapper of a PPU address bus A12 rising edge, the more
    /// accurate trigger real MMC3 hardware uses for its IRQ counter.
    fn ppu_a12_rising(&mut self) {}

    /// The iNES mapper number this implementation corresponds to.
    fn mapper_number(&self) -> u16;

    /// Human-readable mapper name, for diagnostics and save-state metadata.
    fn mapper_name(&self) -> &'static str;

    /// Whether the mapper has battery-backed PRG-RAM.
    fn has_battery(&self) -> bool {
        false
    }

    /// Battery-backed RAM contents, for persisting a save.
    fn battery_ram(&self) -> Option<&[u8]> {
        None
    }

    /// Restore battery-backed RAM contents from a save.
    fn set_battery_ram(&mut self, _data: &[u8]) {}

    /// Reset mapper registers to their power-on state.
    fn reset(&mut self) {}
}
