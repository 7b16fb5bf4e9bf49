//! nescore - NES emulation integration layer.
//!
//! This crate wires the CPU, PPU, APU, and mapper crates into a complete
//! console emulator.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Console                              │
//! │  ┌─────────────────────────────────────────────────────┐   │
//! │  │                      NesBus                          │   │
//! │  │  ┌─────┐  ┌─────┐  ┌─────┐  ┌────────┐  ┌────────┐ │   │
//! │  │  │ RAM │  │ PPU │  │ APU │  │ Mapper │  │ Input  │ │   │
//! │  │  │ 2KB │  │     │  │     │  │        │  │        │ │   │
//! │  │  └─────┘  └─────┘  └─────┘  └────────┘  └────────┘ │   │
//! │  └─────────────────────────────────────────────────────┘   │
//! │                          ▲                                  │
//! │                          │                                  │
//! │                     ┌────┴────┐                             │
//! │                     │   CPU   │                             │
//! │                     │  6502   │                             │
//! │                     └─────────┘                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unlike a per-instruction emulator loop, [`Console::step`] advances the
//! whole system by exactly one master-clock tick: one CPU cycle, three PPU
//! dots, and one APU clock, in lockstep. This keeps CPU/PPU/APU interaction
//! (sprite-0 hit timing, MMC3's A12-edge IRQ counter, DMC DMA stalls)
//! accurate without needing a separate catch-up pass.
//!
//! # Usage
//!
//! ```no_run
//! use nescore::{Button, Console};
//!
//! let rom_data = std::fs::read("game.nes").expect("failed to read ROM");
//! let mut console = Console::new(&rom_data).expect("failed to create console");
//!
//! console.power_on();
//!
//! loop {
//!     console.set_button_1(Button::A, true);
//!     console.step_frame();
//!
//!     let _framebuffer = console.framebuffer();
//!     let _audio = console.take_audio();
//!     break;
//! }
//! ```
//!
//! # Features
//!
//! - `std` (default): standard library support.
//! - `serde`: save-state encoding via [`save_state`], plus `Serialize`/`Deserialize`
//!   on every component's state.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

mod bus;
mod console;
pub mod input;
pub mod palette;
pub mod save_state;

pub use bus::{NesBus, PpuMemory};
pub use console::{timing, Console, ConsoleError};
pub use input::{Button, Controller};

pub use nescore_apu::Apu;
pub use nescore_cpu::Cpu;
pub use nescore_mappers::{create_mapper, Mapper, Mirroring, Rom, RomError, RomHeader};
pub use nescore_ppu::Ppu;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// NES screen dimensions.
pub mod screen {
    /// Screen width in pixels.
    pub const WIDTH: u32 = 256;
    /// Screen height in pixels.
    pub const HEIGHT: u32 = 240;
    /// Total pixels per frame.
    pub const PIXELS: u32 = WIDTH * HEIGHT;
    /// Bytes per frame (RGBA).
    pub const FRAMEBUFFER_SIZE: usize = (PIXELS * 4) as usize;
}
