//! Cycle-accurate Ricoh 2C02 PPU emulation.
//!
//! This crate renders one dot at a time through [`Ppu::step`], called
//! against a [`PpuBus`] the host wires up to CHR ROM/RAM and nametable
//! VRAM. Palette RAM and OAM live inside the PPU itself, matching the real
//! chip.
//!
//! # Usage
//!
//! ```no_run
//! use nescore_ppu::{Ppu, PpuBus};
//!
//! struct MyBus;
//!
//! impl PpuBus for MyBus {
//!     fn read(&mut self, _addr: u16) -> u8 { 0 }
//!     fn write(&mut self, _addr: u16, _value: u8) {}
//! }
//!
//! let mut ppu = Ppu::new();
//! let mut bus = MyBus;
//! let nmi = ppu.step(&mut bus);
//! if nmi {
//!     // deliver to the CPU
//! }
//! ```
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` on the register and pipeline state
//!   for save states. The frame buffer and in-flight sprite evaluation are
//!   not part of the saved state; they rebuild within a frame.

#![cfg_attr(not(feature = "std"), no_std)]

mod background;
mod ctrl;
mod mask;
mod ppu;
mod scroll;
mod sprite;
mod status;
mod timing;

pub use ctrl::Ctrl;
pub use mask::Mask;
pub use ppu::{
    Ppu, PpuBus, DOTS_PER_SCANLINE, FRAME_HEIGHT, FRAME_SIZE, FRAME_WIDTH, SCANLINES_PER_FRAME,
};
pub use scroll::Scroll;
pub use sprite::{
    Sprite, SpriteAttr, SpriteEval, SpriteRender, MAX_SPRITES_PER_LINE, OAM_SIZE,
    SECONDARY_OAM_SIZE,
};
pub use status::Status;
pub use timing::{Timing, PRE_RENDER_SCANLINE, VBLANK_START_SCANLINE};
