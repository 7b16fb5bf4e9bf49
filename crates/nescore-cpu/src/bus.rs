//! The memory-access seam the CPU is driven through.

/// Everything the CPU needs from the rest of the console.
///
/// Implemented by the system bus; the CPU crate never reaches into PPU/APU
/// state directly.
pub trait CpuBus {
    /// Read a byte, with side effects (PPU/APU register reads, mapper state).
    fn read(&mut self, addr: u16) -> u8;

    /// Write a byte, with side effects.
    fn write(&mut self, addr: u16, value: u8);

    /// Read a byte without side effects, for disassembly/tracing.
    fn peek(&self, addr: u16) -> u8;
}
