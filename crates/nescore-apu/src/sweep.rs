//! Pulse channel sweep unit.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which pulse channel this sweep unit belongs to; channel 1's negate mode
/// subtracts one extra, giving the two channels slightly different ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PulseChannel {
    /// Pulse 1 ($4000-$4003).
    One,
    /// Pulse 2 ($4004-$4007).
    Two,
}

/// Pulse channel sweep unit: periodically nudges the timer period up or down.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sweep {
    channel: PulseChannel,
    enabled: bool,
    period: u8,
    negate: bool,
    shift: u8,
    divider: u8,
    reload: bool,
}

impl Sweep {
    /// Fresh, disabled sweep unit for the given pulse channel.
    #[must_use]
    pub const fn new(channel: PulseChannel) -> Self {
        Self {
            channel,
            enabled: false,
            period: 0,
            negate: false,
            shift: 0,
            divider: 0,
            reload: false,
        }
    }

    /// Write the `$4001`/`$4005` sweep control byte.
    pub fn write(&mut self, value: u8) {
        self.enabled = value & 0x80 != 0;
        self.period = (value >> 4) & 0x07;
        self.negate = value & 0x08 != 0;
        self.shift = value & 0x07;
        self.reload = true;
    }

    /// The period the timer would move to if swept right now.
    #[must_use]
    pub fn target_period(&self, current_period: u16) -> Option<u16> {
        let change = current_period >> self.shift;
        if self.negate {
            let delta = match self.channel {
                PulseChannel::One => !change,
                PulseChannel::Two => (!change).wrapping_add(1),
            };
            Some(current_period.wrapping_add(delta))
        } else {
            Some(current_period.wrapping_add(change))
        }
    }

    /// Whether sweeping is currently silencing the channel (period out of range).
    #[must_use]
    pub fn muted(&self, current_period: u16) -> bool {
        current_period < 8 || self.target_period(current_period).unwrap_or(0) > 0x7FF
    }

    /// Clock the sweep divider, called once per half frame. Returns the new
    /// period if the sweep actually updated it this clock.
    pub fn clock(&mut self, current_period: u16) -> Option<u16> {
        let mut result = None;
        if self.divider == 0 && self.enabled && self.shift > 0 && !self.muted(current_period) {
            result = self.target_period(current_period);
        }
        if self.divider == 0 || self.reload {
            self.divider = self.period;
            self.reload = false;
        } else {
            self.divider -= 1;
        }
        result
    }
}
