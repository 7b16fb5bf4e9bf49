//! The frame sequencer that divides the APU's clock into quarter- and
//! half-frame ticks, plus the optional frame IRQ.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Four-step mode fires an IRQ on its last step unless inhibited; five-step
/// mode never fires an IRQ but clocks one extra, silent step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FrameCounterMode {
    /// 4-step sequence (NTSC default), ~60 Hz half frames, IRQ on step 4.
    #[default]
    FourStep,
    /// 5-step sequence, no IRQ, an extra silent step inserted.
    FiveStep,
}

/// What a clocked frame-sequencer step triggers this cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameEvent {
    /// Clock envelopes and the triangle's linear counter.
    pub quarter_frame: bool,
    /// Clock length counters and sweep units (implies `quarter_frame`).
    pub half_frame: bool,
    /// Set the frame IRQ flag.
    pub irq: bool,
}

/// CPU-cycle offsets at which the four-step sequence fires events.
const FOUR_STEP_CYCLES: [u16; 4] = [7457, 14913, 22371, 29829];

/// Cycle offsets for the five-step sequence; note it omits the IRQ entirely.
const FIVE_STEP_CYCLES: [u16; 5] = [7457, 14913, 22371, 29829, 37281];

/// Drives the quarter/half-frame clocking of every channel's envelope,
/// sweep, and length counter.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameCounter {
    mode: FrameCounterMode,
    irq_inhibit: bool,
    irq_flag: bool,
    cycle: u16,
    step: u8,
    /// Countdown until a pending `$4017` write takes effect; real hardware
    /// delays the reset by 3-4 CPU cycles depending on write alignment.
    pending_reset: Option<u8>,
}

impl FrameCounter {
    /// Fresh frame counter in four-step mode with the IRQ enabled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: FrameCounterMode::FourStep,
            irq_inhibit: false,
            irq_flag: false,
            cycle: 0,
            step: 0,
            pending_reset: None,
        }
    }

    /// Write `$4017`. Bit 7 selects 5-step mode, bit 6 inhibits the IRQ.
    /// `delay` is the number of CPU cycles before the reset takes effect (3
    /// or 4, depending on whether the write landed on an even or odd cycle).
    pub fn write(&mut self, value: u8, delay: u8) {
        self.mode =
            if value & 0x80 != 0 { FrameCounterMode::FiveStep } else { FrameCounterMode::FourStep };
        self.irq_inhibit = value & 0x40 != 0;
        if self.irq_inhibit {
            self.irq_flag = false;
        }
        self.pending_reset = Some(delay);
    }

    /// Whether the frame IRQ flag is currently set.
    #[must_use]
    pub const fn irq_flag(&self) -> bool {
        self.irq_flag
    }

    /// Acknowledge (clear) the frame IRQ flag, as happens on a `$4015` read.
    pub fn clear_irq(&mut self) {
        self.irq_flag = false;
    }

    fn sequence(&self) -> &'static [u16] {
        match self.mode {
            FrameCounterMode::FourStep => &FOUR_STEP_CYCLES,
            FrameCounterMode::FiveStep => &FIVE_STEP_CYCLES,
        }
    }

    /// Clock the sequencer by one APU cycle.
    pub fn clock(&mut self) -> FrameEvent {
        let mut event = FrameEvent::default();

        if let Some(delay) = self.pending_reset {
            if delay == 0 {
                self.cycle = 0;
                self.step = 0;
                self.pending_reset = None;
                if self.mode == FrameCounterMode::FiveStep {
                    event.quarter_frame = true;
                    event.half_frame = true;
                }
                return event;
            }
            self.pending_reset = Some(delay - 1);
        }

        self.cycle += 1;
        let sequence = self.sequence();
        if self.step as usize >= sequence.len() {
            return event;
        }

        if self.cycle == sequence[self.step as usize] {
            let is_last_step = self.step as usize == sequence.len() - 1;
            let quarter_frame_steps: &[u8] = match self.mode {
                FrameCounterMode::FourStep => &[0, 1, 2, 3],
                FrameCounterMode::FiveStep => &[0, 1, 2, 4],
            };
            let half_frame_steps: &[u8] = match self.mode {
                FrameCounterMode::FourStep => &[1, 3],
                FrameCounterMode::FiveStep => &[1, 4],
            };

            event.quarter_frame = quarter_frame_steps.contains(&self.step);
            event.half_frame = half_frame_steps.contains(&self.step);
            if self.mode == FrameCounterMode::FourStep && is_last_step && !self.irq_inhibit {
                self.irq_flag = true;
                event.irq = true;
            }

            if is_last_step {
                self.cycle = 0;
                self.step = 0;
            } else {
                self.step += 1;
            }
        }

        event
    }
}

impl Default for FrameCounter {
    fn default() -> Self {
        Self::new()
    }
}
