//! Delta modulation channel (`$4010-$4013`): streams 1-bit delta-encoded
//! samples from cartridge space via DMA.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::timer::Timer;

/// Which video system's clock rate the DMC's rate table should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum System {
    /// 60 Hz NTSC timing.
    Ntsc,
    /// 50 Hz PAL timing.
    Pal,
}

/// DMC sample rate table in CPU cycles, indexed by the 4-bit rate selector
/// in `$4010`.
const DMC_RATE_NTSC: [u16; 16] = [
    428, 380, 340, 320, 286, 254, 226, 214, 190, 160, 142, 128, 106, 84, 72, 54,
];

/// PAL clocks its noise and DMC channels from a slightly different table.
const DMC_RATE_PAL: [u16; 16] = [
    398, 354, 316, 298, 276, 236, 210, 198, 176, 148, 132, 118, 98, 78, 66, 50,
];

/// Delta modulation channel.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DmcChannel {
    system: System,
    timer: Timer,
    irq_enable: bool,
    loop_flag: bool,
    rate_index: u8,
    output_level: u8,
    sample_address: u16,
    sample_length: u16,
    current_address: u16,
    bytes_remaining: u16,
    sample_buffer: Option<u8>,
    shift_register: u8,
    bits_remaining: u8,
    silence: bool,
    irq_flag: bool,
}

impl DmcChannel {
    /// Fresh, silent DMC channel for the given video system.
    #[must_use]
    pub const fn new(system: System) -> Self {
        Self {
            system,
            timer: Timer::new(),
            irq_enable: false,
            loop_flag: false,
            rate_index: 0,
            output_level: 0,
            sample_address: 0,
            sample_length: 0,
            current_address: 0,
            bytes_remaining: 0,
            sample_buffer: None,
            shift_register: 0,
            bits_remaining: 8,
            silence: true,
            irq_flag: false,
        }
    }

    fn rate_table(&self) -> &'static [u16; 16] {
        match self.system {
            System::Ntsc => &DMC_RATE_NTSC,
            System::Pal => &DMC_RATE_PAL,
        }
    }

    /// Write `$4010`: IRQ enable, loop flag, and playback rate.
    pub fn write_ctrl(&mut self, value: u8) {
        self.irq_enable = value & 0x80 != 0;
        self.loop_flag = value & 0x40 != 0;
        self.rate_index = value & 0x0F;
        self.timer.set_period(self.rate_table()[self.rate_index as usize]);
        if !self.irq_enable {
            self.irq_flag = false;
        }
    }

    /// Write `$4011`: direct 7-bit output level load.
    pub fn write_output_level(&mut self, value: u8) {
        self.output_level = value & 0x7F;
    }

    /// Write `$4012`: sample start address, encoded as `$C000 + addr * 64`.
    pub fn write_sample_address(&mut self, value: u8) {
        self.sample_address = 0xC000 + u16::from(value) * 64;
    }

    /// Write `$4013`: sample length, encoded as `len * 16 + 1` bytes.
    pub fn write_sample_length(&mut self, value: u8) {
        self.sample_length = u16::from(value) * 16 + 1;
    }

    /// Enable or disable the channel via `$4015`; enabling restarts the
    /// sample if the byte counter is currently empty.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.bytes_remaining = 0;
        } else if self.bytes_remaining == 0 {
            self.current_address = self.sample_address;
            self.bytes_remaining = self.sample_length;
        }
    }

    /// Whether the sample byte counter is still running, for `$4015` reads.
    #[must_use]
    pub const fn active(&self) -> bool {
        self.bytes_remaining > 0
    }

    /// Whether the DMC's IRQ flag is set.
    #[must_use]
    pub const fn irq_flag(&self) -> bool {
        self.irq_flag
    }

    /// Acknowledge (clear) the DMC IRQ flag, as happens on a `$4015` read.
    pub fn clear_irq(&mut self) {
        self.irq_flag = false;
    }

    /// Clock the timer, called once every other CPU cycle. `fetch` performs
    /// the DMA read from cartridge space when a new sample byte is needed;
    /// it is only invoked when the sample buffer is empty and bytes remain.
    pub fn clock_timer(&mut self, mut fetch: impl FnMut(u16) -> u8) {
        if !self.timer.clock() {
            return;
        }

        if self.sample_buffer.is_none() && self.bytes_remaining > 0 {
            self.sample_buffer = Some(fetch(self.current_address));
            self.current_address = if self.current_address == 0xFFFF {
                0x8000
            } else {
                self.current_address + 1
            };
            self.bytes_remaining -= 1;
            if self.bytes_remaining == 0 {
                if self.loop_flag {
                    self.current_address = self.sample_address;
                    self.bytes_remaining = self.sample_length;
                } else if self.irq_enable {
                    self.irq_flag = true;
                }
            }
        }

        self.clock_output_shifter();
    }

    fn clock_output_shifter(&mut self) {
        if self.bits_remaining == 8 {
            self.bits_remaining = 0;
            if let Some(sample) = self.sample_buffer.take() {
                self.shift_register = sample;
                self.silence = false;
            } else {
                self.silence = true;
            }
        }

        if !self.silence {
            if self.shift_register & 0x01 != 0 {
                if self.output_level <= 125 {
                    self.output_level += 2;
                }
            } else if self.output_level >= 2 {
                self.output_level -= 2;
            }
            self.shift_register >>= 1;
        }

        self.bits_remaining += 1;
    }

    /// Current 7-bit output level.
    #[must_use]
    pub const fn output(&self) -> u8 {
        self.output_level
    }
}
