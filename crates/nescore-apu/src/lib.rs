//! Cycle-accurate Ricoh 2A03 APU emulation.
//!
//! Models all five NES audio channels — two pulse generators, a triangle,
//! noise, and delta modulation — driven by a shared frame sequencer, and
//! mixes them into a single `f32` sample per call to [`Apu::output`].
//!
//! ```
//! use nescore_apu::{Apu, System};
//!
//! let mut apu = Apu::new(System::Ntsc);
//! apu.write_register(0x4015, 0x01);
//! apu.write_register(0x4000, 0x3F);
//! apu.write_register(0x4003, 0x08);
//! apu.clock(|_addr| 0);
//! let _sample = apu.output();
//! ```
#![cfg_attr(not(feature = "std"), no_std)]

mod apu;
mod dmc;
mod envelope;
mod frame_counter;
mod length_counter;
mod noise;
mod pulse;
mod sweep;
mod timer;
mod triangle;

pub use apu::Apu;
pub use dmc::{DmcChannel, System};
pub use envelope::Envelope;
pub use frame_counter::{FrameCounter, FrameCounterMode, FrameEvent};
pub use length_counter::{LengthCounter, LENGTH_TABLE};
pub use noise::NoiseChannel;
pub use pulse::Pulse;
pub use sweep::{PulseChannel, Sweep};
pub use timer::Timer;
pub use triangle::TriangleChannel;
