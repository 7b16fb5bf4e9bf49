//! PPU register behavior observed through the CPU-facing `$2000-$2007` window.

mod common;

use common::nrom_with_program;
use nescore::{timing, Console};
use nescore_cpu::CpuBus;

#[test]
fn vram_data_port_is_buffered_one_read_behind() {
    let rom = nrom_with_program(&[0xEA]);
    let mut console = Console::new(&rom).unwrap();
    console.power_on();

    let bus = console.bus_mut();

    // Point the VRAM address at a nametable byte and write through it.
    bus.write(0x2006, 0x20);
    bus.write(0x2006, 0x00);
    bus.write(0x2007, 0x55);

    // Reset the address back to the same byte.
    bus.write(0x2006, 0x20);
    bus.write(0x2006, 0x00);

    // First read returns whatever was buffered before (not 0x55 yet), and
    // primes the buffer with the byte at $2000.
    let _stale = bus.read(0x2007);
    // Second read returns what the first read buffered.
    let primed = bus.read(0x2007);

    assert_eq!(primed, 0x55);
}

#[test]
fn ppu_status_read_clears_vblank_and_the_write_latch() {
    let rom = nrom_with_program(&[0xEA]);
    let mut console = Console::new(&rom).unwrap();
    console.power_on();

    // Stop comfortably inside the 20-scanline vblank window: well past the
    // dot vblank is set (scanline 241) but well before the pre-render
    // scanline clears it again at the very end of the frame.
    for _ in 0..(timing::CPU_CYCLES_PER_FRAME - 2000) {
        console.step();
    }

    let bus = console.bus_mut();
    let status = bus.read(0x2002);
    assert_ne!(status & 0x80, 0, "vblank flag should be set during vblank");

    let status_again = bus.read(0x2002);
    assert_eq!(status_again & 0x80, 0, "reading $2002 clears the vblank flag");
}
