//! APU register access and length-counter silencing through the full bus.

mod common;

use common::nrom_with_program;
use nescore::Console;
use nescore_cpu::CpuBus;

#[test]
fn pulse_channel_silences_when_its_length_counter_expires() {
    let rom = nrom_with_program(&[0xEA]);
    let mut console = Console::new(&rom).unwrap();
    console.power_on();

    let bus = console.bus_mut();
    bus.write(0x4015, 0x01); // enable pulse 1
    bus.write(0x4000, 0x0F); // constant volume, full volume, length-counter halt CLEAR
                              // Length-counter load index 3 -> table value 2, the shortest
                              // non-zero entry: two half-frame clocks to silence.
    bus.write(0x4003, 0x18);

    assert_ne!(console.bus_mut().read(0x4015) & 0x01, 0, "pulse 1 should start out active");

    // A half-frame clocks roughly every ~7,457 CPU cycles; two frames is
    // comfortably more than the two half-frame clocks this length counter
    // needs to reach zero.
    for _ in 0..2 {
        console.step_frame();
    }

    assert_eq!(
        console.bus_mut().read(0x4015) & 0x01,
        0,
        "pulse 1's length counter should have silenced the channel"
    );
}

#[test]
fn disabling_a_channel_via_4015_immediately_clears_its_status_bit() {
    let rom = nrom_with_program(&[0xEA]);
    let mut console = Console::new(&rom).unwrap();
    console.power_on();

    let bus = console.bus_mut();
    bus.write(0x4015, 0x01);
    bus.write(0x4003, 0x08); // a long length counter that wouldn't expire on its own
    assert_ne!(bus.read(0x4015) & 0x01, 0);

    bus.write(0x4015, 0x00);
    assert_eq!(bus.read(0x4015) & 0x01, 0);
}
