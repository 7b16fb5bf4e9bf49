//! Sprite-0 hit detection through a full PPU frame.

mod common;

use nescore::Console;
use nescore_cpu::CpuBus;

/// An NROM image whose entire CHR-ROM is solid (every pattern byte `0xFF`),
/// so every background tile and every sprite tile renders as fully opaque
/// regardless of tile index or attribute byte. This isolates sprite-0 hit
/// timing from needing a specific tileset.
fn nrom_with_solid_chr() -> Vec<u8> {
    let mut rom = vec![0u8; 16 + 32768 + 8192];
    rom[0] = 0x4E;
    rom[1] = 0x45;
    rom[2] = 0x53;
    rom[3] = 0x1A;
    rom[4] = 2;
    rom[5] = 1;
    rom[6] = 0x00;

    rom[16 + 0x7FFC] = 0x00;
    rom[16 + 0x7FFD] = 0x80;
    rom[16] = 0xEA; // NOP, parked at the reset vector

    let chr_start = 16 + 32768;
    rom[chr_start..chr_start + 8192].fill(0xFF);

    rom
}

#[test]
fn overlapping_opaque_background_and_sprite_zero_sets_the_hit_flag() {
    let rom = nrom_with_solid_chr();
    let mut console = Console::new(&rom).unwrap();
    console.power_on();

    let bus = console.bus_mut();

    // Sprite 0: Y=10, tile 0, no flip/priority bits, X=16.
    bus.write(0x2003, 0x00);
    bus.write(0x2004, 10);
    bus.write(0x2004, 0x00);
    bus.write(0x2004, 0x00);
    bus.write(0x2004, 16);

    // Enable background and sprites, including their leftmost 8 columns.
    bus.write(0x2001, 0x1E);

    // Sprite 0 is at Y=10, so the hit fires a handful of scanlines into the
    // frame. Stop well short of the pre-render scanline (which clears the
    // flag again at the very end of the frame) so the flag is still
    // observable. ~15,000 CPU cycles is ~scanline 130 at 3 PPU dots/cycle.
    for _ in 0..15_000 {
        console.step();
    }

    let status = console.bus_mut().read(0x2002);
    assert_ne!(status & 0x40, 0, "sprite-0 hit flag was never set for solid overlapping tiles");
}
