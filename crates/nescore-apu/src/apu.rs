//! The top-level 2A03 APU: register dispatch, channel clocking, and mixing.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dmc::{DmcChannel, System};
use crate::frame_counter::FrameCounter;
use crate::noise::NoiseChannel;
use crate::pulse::Pulse;
use crate::sweep::PulseChannel;
use crate::triangle::TriangleChannel;

/// The 2A03 APU: five channels, a shared frame sequencer, and the mixer.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Apu {
    pulse1: Pulse,
    pulse2: Pulse,
    triangle: TriangleChannel,
    noise: NoiseChannel,
    dmc: DmcChannel,
    frame_counter: FrameCounter,
    cycle: u64,
}

impl Apu {
    /// Fresh APU for the given video system, all channels silent.
    #[must_use]
    pub const fn new(system: System) -> Self {
        Self {
            pulse1: Pulse::new(PulseChannel::One),
            pulse2: Pulse::new(PulseChannel::Two),
            triangle: TriangleChannel::new(),
            noise: NoiseChannel::new(),
            dmc: DmcChannel::new(system),
            frame_counter: FrameCounter::new(),
            cycle: 0,
        }
    }

    /// Dispatch a CPU write to `$4000-$4017`. Returns nothing; DMC DMA sample
    /// fetches happen separately via [`Apu::clock`].
    pub fn write_register(&mut self, addr: u16, value: u8) {
        match addr {
            0x4000 => self.pulse1.write_ctrl(value),
            0x4001 => self.pulse1.write_sweep(value),
            0x4002 => self.pulse1.write_timer_lo(value),
            0x4003 => self.pulse1.write_length(value),
            0x4004 => self.pulse2.write_ctrl(value),
            0x4005 => self.pulse2.write_sweep(value),
            0x4006 => self.pulse2.write_timer_lo(value),
            0x4007 => self.pulse2.write_length(value),
            0x4008 => self.triangle.write_linear_counter(value),
            0x400A => self.triangle.write_timer_lo(value),
            0x400B => self.triangle.write_length(value),
            0x400C => self.noise.write_ctrl(value),
            0x400E => self.noise.write_period(value),
            0x400F => self.noise.write_length(value),
            0x4010 => self.dmc.write_ctrl(value),
            0x4011 => self.dmc.write_output_level(value),
            0x4012 => self.dmc.write_sample_address(value),
            0x4013 => self.dmc.write_sample_length(value),
            0x4015 => self.write_status(value),
            0x4017 => {
                let delay = if self.cycle % 2 == 0 { 3 } else { 4 };
                self.frame_counter.write(value, delay);
            }
            _ => {}
        }
    }

    fn write_status(&mut self, value: u8) {
        self.pulse1.set_enabled(value & 0x01 != 0);
        self.pulse2.set_enabled(value & 0x02 != 0);
        self.triangle.set_enabled(value & 0x04 != 0);
        self.noise.set_enabled(value & 0x08 != 0);
        self.dmc.set_enabled(value & 0x10 != 0);
    }

    /// Read `$4015`: channel active flags plus the frame and DMC IRQ flags.
    /// Reading clears the frame IRQ flag (but not the DMC one).
    pub fn read_status(&mut self) -> u8 {
        let value = (self.pulse1.length_active() as u8)
            | (self.pulse2.length_active() as u8) << 1
            | (self.triangle.length_active() as u8) << 2
            | (self.noise.length_active() as u8) << 3
            | (self.dmc.active() as u8) << 4
            | (self.frame_counter.irq_flag() as u8) << 6
            | (self.dmc.irq_flag() as u8) << 7;
        self.frame_counter.clear_irq();
        value
    }

    /// Non-mutating equivalent of [`Apu::read_status`], for debug/peek paths
    /// that must not clear the frame IRQ flag as a side effect.
    #[must_use]
    pub const fn peek_status(&self) -> u8 {
        (self.pulse1.length_active() as u8)
            | (self.pulse2.length_active() as u8) << 1
            | (self.triangle.length_active() as u8) << 2
            | (self.noise.length_active() as u8) << 3
            | (self.dmc.active() as u8) << 4
            | (self.frame_counter.irq_flag() as u8) << 6
            | (self.dmc.irq_flag() as u8) << 7
    }

    /// Whether either the frame sequencer or the DMC wants to assert IRQ.
    #[must_use]
    pub const fn irq_pending(&self) -> bool {
        self.frame_counter.irq_flag() || self.dmc.irq_flag()
    }

    /// Clock the APU by one CPU cycle. `fetch` performs the DMC's DMA sample
    /// read from cartridge space when needed.
    pub fn clock(&mut self, mut fetch: impl FnMut(u16) -> u8) {
        self.triangle.clock_timer();

        if self.cycle % 2 == 1 {
            self.pulse1.clock_timer();
            self.pulse2.clock_timer();
            self.noise.clock_timer();
            self.dmc.clock_timer(&mut fetch);
        }

        let event = self.frame_counter.clock();
        if event.quarter_frame {
            self.pulse1.clock_envelope();
            self.pulse2.clock_envelope();
            self.triangle.clock_linear_counter();
            self.noise.clock_envelope();
        }
        if event.half_frame {
            self.pulse1.clock_length_and_sweep();
            self.pulse2.clock_length_and_sweep();
            self.triangle.clock_length();
            self.noise.clock_length();
        }

        self.cycle += 1;
    }

    /// Mixed analog output sample in `[0.0, 1.0)`, using a simple linear mix
    /// of the five channels' 0-15 (0-127 for DMC) outputs rather than the
    /// non-linear lookup tables real hardware's mixer implements.
    #[must_use]
    pub fn output(&self) -> f32 {
        let pulse = f32::from(self.pulse1.output()) + f32::from(self.pulse2.output());
        let triangle = f32::from(self.triangle.output());
        let noise = f32::from(self.noise.output());
        let dmc = f32::from(self.dmc.output());
        0.10 * (pulse + triangle + noise) / 15.0 + 0.10 * dmc / 127.0
    }
}
