//! High-level NES console emulation API.
//!
//! [`Console`] owns the CPU and system bus and drives them one master-clock
//! tick at a time: the PPU runs 3 dots per CPU cycle, the APU clocks 1:1
//! with the CPU, and the CPU itself advances by calling [`nescore_cpu::Cpu::clock`]
//! once per tick rather than once per instruction.

use nescore_cpu::Cpu;
use nescore_mappers::{create_mapper, Mapper, Rom, RomError};

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, string::String, vec, vec::Vec};

use crate::bus::NesBus;
use crate::input::{Button, Controller};

/// NES emulation timing constants.
pub mod timing {
    /// Master clock frequency (NTSC).
    pub const MASTER_CLOCK_NTSC: u32 = 21_477_272;
    /// CPU clock frequency (NTSC).
    pub const CPU_CLOCK_NTSC: u32 = MASTER_CLOCK_NTSC / 12;
    /// PPU clock frequency (NTSC).
    pub const PPU_CLOCK_NTSC: u32 = MASTER_CLOCK_NTSC / 4;
    /// CPU cycles per frame (NTSC).
    pub const CPU_CYCLES_PER_FRAME: u32 = 29_780;
    /// PPU dots per scanline.
    pub const PPU_DOTS_PER_SCANLINE: u16 = 341;
    /// Total scanlines (including vblank).
    pub const PPU_SCANLINES: u16 = 262;
    /// Target frame rate (NTSC).
    pub const FRAME_RATE_NTSC: f64 = 60.0988;
}

/// Errors from loading a ROM or driving the console.
#[derive(Debug, Clone)]
pub enum ConsoleError {
    /// ROM loading error.
    RomError(RomError),
    /// Invalid state.
    InvalidState(String),
}

impl From<RomError> for ConsoleError {
    fn from(err: RomError) -> Self {
        Self::RomError(err)
    }
}

impl core::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::RomError(e) => write!(f, "ROM error: {e}"),
            Self::InvalidState(msg) => write!(f, "invalid state: {msg}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConsoleError {}

/// NES console emulator: CPU, bus, and the host-facing frame/audio output.
pub struct Console {
    cpu: Cpu,
    bus: NesBus,
    framebuffer: Vec<u8>,
    audio_buffer: Vec<f32>,
    total_cycles: u64,
    frame_count: u64,
    running: bool,
}

impl Console {
    /// Load and parse a ROM, build its mapper, and power on a console for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the ROM header is invalid or names an
    /// unsupported mapper.
    pub fn new(rom_data: &[u8]) -> Result<Self, ConsoleError> {
        let rom = Rom::load(rom_data)?;
        let mapper = create_mapper(&rom)?;
        Self::with_mapper(mapper)
    }

    /// Build a console around an already-constructed mapper.
    ///
    /// # Errors
    ///
    /// Present for symmetry with [`Console::new`]; this constructor cannot
    /// currently fail.
    pub fn with_mapper(mapper: Box<dyn Mapper>) -> Result<Self, ConsoleError> {
        Ok(Self {
            cpu: Cpu::new(),
            bus: NesBus::new(mapper),
            framebuffer: vec![0; 256 * 240 * 4],
            audio_buffer: Vec::with_capacity(2048),
            total_cycles: 0,
            frame_count: 0,
            running: true,
        })
    }

    /// Reset the console (equivalent to pressing the NES reset button).
    pub fn reset(&mut self) {
        self.bus.reset();
        self.cpu.reset(&mut self.bus);
        self.total_cycles = 0;
        self.running = true;
    }

    /// Power on the console (cold boot). Currently identical to [`Console::reset`]:
    /// this core doesn't model power-on RAM garbage.
    pub fn power_on(&mut self) {
        self.reset();
    }

    /// Advance the console by exactly one master-clock tick (one CPU cycle's
    /// worth of PPU/APU/CPU work). Returns the number of CPU cycles this
    /// tick charged (1, except while an OAM DMA transfer is in flight).
    pub fn step(&mut self) -> u8 {
        if !self.running {
            return 0;
        }

        if self.bus.dmc_stall_active() {
            self.bus.decrement_dmc_stall();
            self.step_components();
            self.total_cycles += 1;
            return 1;
        }

        if self.bus.oam_dma_pending() {
            let cycles = self.bus.execute_oam_dma();
            for _ in 0..cycles {
                self.step_components();
            }
            self.total_cycles += u64::from(cycles);
            return cycles as u8;
        }

        if self.bus.nmi_pending() {
            self.bus.acknowledge_nmi();
            self.cpu.request_nmi();
        }
        self.cpu.set_irq_line(self.bus.irq_pending());

        self.cpu.clock(&mut self.bus);
        self.step_components();
        self.bus.add_cpu_cycles(1);
        self.total_cycles += 1;

        1
    }

    /// Step the PPU (3 dots) and APU (1 clock) for the CPU cycle just spent.
    fn step_components(&mut self) {
        self.bus.step_ppu();
        if let Some(sample) = self.bus.step_apu() {
            self.audio_buffer.push(sample);
        }
    }

    /// Run emulation for one frame (approximately 29,780 CPU cycles).
    ///
    /// Returns the actual number of CPU cycles executed.
    pub fn step_frame(&mut self) -> u64 {
        let start_cycles = self.total_cycles;
        let target_cycles = self.total_cycles + u64::from(timing::CPU_CYCLES_PER_FRAME);

        while self.total_cycles < target_cycles && self.running {
            self.step();
        }

        self.update_framebuffer();
        self.frame_count += 1;

        self.total_cycles - start_cycles
    }

    /// Convert the PPU's palette-index frame buffer into RGBA.
    fn update_framebuffer(&mut self) {
        let ppu_buffer = self.bus.ppu.frame_buffer();

        for (i, &palette_idx) in ppu_buffer.iter().enumerate() {
            let (r, g, b) = crate::palette::palette_to_rgb(palette_idx);
            let offset = i * 4;
            self.framebuffer[offset] = r;
            self.framebuffer[offset + 1] = g;
            self.framebuffer[offset + 2] = b;
            self.framebuffer[offset + 3] = 255;
        }
    }

    /// The current framebuffer (256x240 RGBA, row-major).
    #[must_use]
    pub fn framebuffer(&self) -> &[u8] {
        &self.framebuffer
    }

    /// Drain and return the accumulated audio samples.
    pub fn take_audio(&mut self) -> Vec<f32> {
        core::mem::take(&mut self.audio_buffer)
    }

    /// The accumulated audio samples, without draining them.
    #[must_use]
    pub fn audio_buffer(&self) -> &[f32] {
        &self.audio_buffer
    }

    /// Clear the accumulated audio samples without returning them.
    pub fn clear_audio_samples(&mut self) {
        self.audio_buffer.clear();
    }

    /// Replace controller 1's entire button state (bit layout per [`Button`]).
    pub fn set_controller_1(&mut self, buttons: u8) {
        self.bus.controller1.set_buttons(buttons);
    }

    /// Replace controller 2's entire button state (bit layout per [`Button`]).
    pub fn set_controller_2(&mut self, buttons: u8) {
        self.bus.controller2.set_buttons(buttons);
    }

    /// Press or release a single button on controller 1.
    pub fn set_button_1(&mut self, button: Button, pressed: bool) {
        self.bus.controller1.set_button(button, pressed);
    }

    /// Press or release a single button on controller 2.
    pub fn set_button_2(&mut self, button: Button, pressed: bool) {
        self.bus.controller2.set_button(button, pressed);
    }

    /// Controller 1's raw button state.
    #[must_use]
    pub fn controller_1(&self) -> u8 {
        self.bus.controller1.buttons()
    }

    /// Controller 2's raw button state.
    #[must_use]
    pub fn controller_2(&self) -> u8 {
        self.bus.controller2.buttons()
    }

    /// Total CPU cycles executed since the last reset.
    #[must_use]
    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    /// Frames rendered since the last reset.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Whether emulation is currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Pause emulation; [`Console::step`] and [`Console::step_frame`] become no-ops.
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Resume emulation after [`Console::pause`].
    pub fn resume(&mut self) {
        self.running = true;
    }

    /// Reference to the CPU, for debugging and tracing.
    #[must_use]
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// Reference to the PPU, for debugging.
    #[must_use]
    pub fn ppu(&self) -> &nescore_ppu::Ppu {
        &self.bus.ppu
    }

    /// Reference to the APU, for debugging.
    #[must_use]
    pub fn apu(&self) -> &nescore_apu::Apu {
        &self.bus.apu
    }

    /// Peek at memory without side effects (no PPU register latches, no
    /// mapper bank-switch writes).
    #[must_use]
    pub fn peek_memory(&self, addr: u16) -> u8 {
        self.bus.peek(addr)
    }

    /// Reference to the system bus, for debugging.
    #[must_use]
    pub fn bus(&self) -> &NesBus {
        &self.bus
    }

    /// Mutable reference to the system bus.
    pub fn bus_mut(&mut self) -> &mut NesBus {
        &mut self.bus
    }

    /// The loaded ROM's iNES mapper number.
    #[must_use]
    pub fn mapper_number(&self) -> u16 {
        self.bus.mapper.mapper_number()
    }

    /// The loaded ROM's mapper name, e.g. `"MMC1"`.
    #[must_use]
    pub fn mapper_name(&self) -> &'static str {
        self.bus.mapper.mapper_name()
    }

    /// Whether the cartridge has battery-backed PRG-RAM.
    #[must_use]
    pub fn has_battery(&self) -> bool {
        self.bus.mapper.has_battery()
    }

    /// Battery-backed RAM contents, for persisting a save.
    #[must_use]
    pub fn battery_ram(&self) -> Option<&[u8]> {
        self.bus.mapper.battery_ram()
    }

    /// Restore battery-backed RAM contents from a save.
    pub fn load_battery_ram(&mut self, data: &[u8]) {
        self.bus.mapper.set_battery_ram(data);
    }

    /// Replace the CPU register file wholesale, for save-state restoration.
    #[cfg(feature = "serde")]
    pub(crate) fn restore_cpu(&mut self, cpu: Cpu) {
        self.cpu = cpu;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nescore_mappers::{Mirroring, Nrom, RomHeader};

    fn create_test_console() -> Console {
        let rom = Rom {
            header: RomHeader {
                prg_rom_size: 32768,
                chr_rom_size: 8192,
                mapper_number: 0,
                submapper: 0,
                mirroring: Mirroring::Vertical,
                has_battery: false,
                has_trainer: false,
                nes2_format: false,
                prg_ram_size: 0,
                prg_nvram_size: 0,
                chr_ram_size: 0,
                chr_nvram_size: 0,
            },
            trainer: None,
            prg_rom: {
                let mut prg = vec![0xEA; 32768];
                prg[0x7FFC] = 0x00;
                prg[0x7FFD] = 0x80;
                prg
            },
            chr_rom: vec![0; 8192],
        };
        let mut console = Console::with_mapper(Box::new(Nrom::new(&rom))).unwrap();
        console.reset();
        console
    }

    #[test]
    fn console_creation_reports_mapper_metadata() {
        let console = create_test_console();
        assert_eq!(console.mapper_number(), 0);
        assert_eq!(console.mapper_name(), "NROM");
    }

    #[test]
    fn stepping_advances_total_cycles() {
        let mut console = create_test_console();
        console.step();
        assert!(console.total_cycles() > 0);
    }

    #[test]
    fn framebuffer_is_256x240_rgba() {
        let console = create_test_console();
        assert_eq!(console.framebuffer().len(), 256 * 240 * 4);
    }

    #[test]
    fn pause_stops_stepping_from_advancing_cycles() {
        let mut console = create_test_console();
        console.pause();
        assert!(!console.is_running());
        console.step();
        assert_eq!(console.total_cycles(), 0);
        console.resume();
        console.step();
        assert!(console.total_cycles() > 0);
    }

    #[test]
    fn controller_button_state_round_trips() {
        let mut console = create_test_console();
        console.set_button_1(Button::A, true);
        console.set_button_1(Button::Start, true);
        assert_eq!(console.controller_1(), 0x09);
    }

    #[test]
    fn reset_zeroes_total_cycles() {
        let mut console = create_test_console();
        for _ in 0..100 {
            console.step();
        }
        assert!(console.total_cycles() > 0);
        console.reset();
        assert_eq!(console.total_cycles(), 0);
    }

    #[test]
    fn step_frame_runs_approximately_one_frame_of_cycles() {
        let mut console = create_test_console();
        let cycles = console.step_frame();
        assert!(cycles >= u64::from(timing::CPU_CYCLES_PER_FRAME));
    }
}
