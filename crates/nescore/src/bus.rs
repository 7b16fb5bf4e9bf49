//! The NES system bus.
//!
//! Connects the CPU to everything else:
//! - PPU registers ($2000-$2007, mirrored every 8 bytes through $3FFF)
//! - APU/IO registers ($4000-$4017)
//! - Cartridge space ($4020-$FFFF)
//! - Internal RAM ($0000-$07FF, mirrored to $1FFF)

use nescore_apu::Apu;
use nescore_cpu::CpuBus;
use nescore_mappers::{Mapper, Mirroring};
use nescore_ppu::Ppu;

use crate::input::Controller;

/// PPU-side memory adapter: routes pattern-table fetches to the mapper and
/// nametable fetches to CIRAM with mirroring applied, and derives PPU A12
/// edges from the addresses the PPU actually fetches (the same way real
/// MMC3 boards detect them on the cartridge edge connector).
pub struct PpuMemory<'a> {
    mapper: &'a mut dyn Mapper,
    ciram: &'a mut [u8; 2048],
    mirroring: Mirroring,
    last_a12: &'a mut bool,
}

impl PpuMemory<'_> {
    fn ciram_addr(&self, addr: u16) -> usize {
        self.mirroring.map_address(addr & 0x0FFF) as usize
    }

    fn note_a12(&mut self, addr: u16) {
        let a12 = addr & 0x1000 != 0;
        if a12 && !*self.last_a12 {
            self.mapper.ppu_a12_rising();
        }
        *self.last_a12 = a12;
    }
}

impl nescore_ppu::PpuBus for PpuMemory<'_> {
    fn read(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => {
                self.note_a12(addr);
                self.mapper.read_chr(addr)
            }
            0x2000..=0x3EFF => self.ciram[self.ciram_addr(addr)],
            _ => 0,
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => {
                self.note_a12(addr);
                self.mapper.write_chr(addr, value);
            }
            0x2000..=0x3EFF => {
                let idx = self.ciram_addr(addr);
                self.ciram[idx] = value;
            }
            _ => {}
        }
    }
}

/// NES system bus, tying RAM, PPU, APU, mapper, and controllers together
/// behind the CPU's memory map.
pub struct NesBus {
    ram: [u8; 2048],
    ciram: [u8; 2048],
    ppu_last_a12: bool,
    /// PPU (2C02).
    pub ppu: Ppu,
    /// APU (2A03).
    pub apu: Apu,
    /// Cartridge mapper.
    pub mapper: Box<dyn Mapper>,
    /// Controller port 1.
    pub controller1: Controller,
    /// Controller port 2.
    pub controller2: Controller,
    oam_dma_page: Option<u8>,
    cpu_cycles: u64,
    dmc_stall_cycles: u8,
    last_bus_value: u8,
    nmi_pending: bool,
    sample_sum: f32,
    sample_count: u32,
}

impl NesBus {
    /// CPU cycles between audio samples at a 44.1kHz output rate.
    const CYCLES_PER_SAMPLE: u32 = 40;

    /// Build a fresh bus around the given mapper.
    #[must_use]
    pub fn new(mapper: Box<dyn Mapper>) -> Self {
        Self {
            ram: [0; 2048],
            ciram: [0; 2048],
            ppu_last_a12: false,
            ppu: Ppu::new(),
            apu: Apu::new(nescore_apu::System::Ntsc),
            mapper,
            controller1: Controller::new(),
            controller2: Controller::new(),
            oam_dma_page: None,
            cpu_cycles: 0,
            dmc_stall_cycles: 0,
            last_bus_value: 0,
            nmi_pending: false,
            sample_sum: 0.0,
            sample_count: 0,
        }
    }

    /// Reset the bus and every attached component.
    pub fn reset(&mut self) {
        self.ram.fill(0);
        self.ciram.fill(0);
        self.ppu_last_a12 = false;
        self.ppu = Ppu::new();
        self.apu = Apu::new(nescore_apu::System::Ntsc);
        self.mapper.reset();
        self.controller1.reset();
        self.controller2.reset();
        self.oam_dma_page = None;
        self.cpu_cycles = 0;
        self.dmc_stall_cycles = 0;
        self.last_bus_value = 0;
        self.nmi_pending = false;
        self.sample_sum = 0.0;
        self.sample_count = 0;
    }

    /// Whether an OAM DMA transfer is latched and waiting to run.
    #[must_use]
    pub fn oam_dma_pending(&self) -> bool {
        self.oam_dma_page.is_some()
    }

    /// Execute a latched OAM DMA transfer. Returns the CPU cycles consumed
    /// (513, or 514 on an odd CPU cycle).
    pub fn execute_oam_dma(&mut self) -> u16 {
        let Some(page) = self.oam_dma_page.take() else { return 0 };
        let base = u16::from(page) << 8;

        for i in 0..256u16 {
            let addr = base.wrapping_add(i);
            let data = self.cpu_read(addr);
            self.ppu.oam_dma_write(i as u8, data);
        }

        let cycles = if self.cpu_cycles % 2 == 1 { 514 } else { 513 };
        self.cpu_cycles += u64::from(cycles);
        cycles
    }

    fn cpu_read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram[(addr & 0x07FF) as usize],
            0x4020..=0xFFFF => self.mapper.read_prg(addr),
            _ => self.last_bus_value,
        }
    }

    fn ppu_memory(&mut self) -> PpuMemory<'_> {
        PpuMemory {
            mapper: &mut *self.mapper,
            ciram: &mut self.ciram,
            mirroring: self.mapper.mirroring(),
            last_a12: &mut self.ppu_last_a12,
        }
    }

    /// Internal RAM, for save-state encoding.
    #[cfg(feature = "serde")]
    pub(crate) fn ram(&self) -> &[u8; 2048] {
        &self.ram
    }

    /// Mutable internal RAM, for save-state decoding.
    #[cfg(feature = "serde")]
    pub(crate) fn ram_mut(&mut self) -> &mut [u8; 2048] {
        &mut self.ram
    }

    /// Nametable RAM (CIRAM), for save-state encoding.
    #[cfg(feature = "serde")]
    pub(crate) fn ciram(&self) -> &[u8; 2048] {
        &self.ciram
    }

    /// Mutable nametable RAM (CIRAM), for save-state decoding.
    #[cfg(feature = "serde")]
    pub(crate) fn ciram_mut(&mut self) -> &mut [u8; 2048] {
        &mut self.ciram
    }

    /// Step the PPU by 3 dots (one CPU cycle's worth). Returns whether NMI
    /// should now be delivered to the CPU.
    pub fn step_ppu(&mut self) -> bool {
        let mut nmi = false;
        for _ in 0..3 {
            let mut mem = self.ppu_memory();
            if self.ppu.step(&mut mem) {
                nmi = true;
            }
        }
        if nmi {
            self.nmi_pending = true;
        }
        nmi
    }

    /// Step the APU by one CPU cycle, fetching DMC DMA bytes from the
    /// mapper as needed. Returns a downsampled audio sample when one is
    /// ready.
    pub fn step_apu(&mut self) -> Option<f32> {
        let mapper = &self.mapper;
        self.apu.clock(|addr| mapper.read_prg(addr));

        self.sample_sum += self.apu.output();
        self.sample_count += 1;

        if self.sample_count >= Self::CYCLES_PER_SAMPLE {
            #[allow(clippy::cast_precision_loss)]
            let sample = self.sample_sum / self.sample_count as f32;
            self.sample_count = 0;
            self.sample_sum = 0.0;
            Some(sample)
        } else {
            None
        }
    }

    /// Whether NMI is latched and awaiting delivery.
    #[must_use]
    pub fn nmi_pending(&self) -> bool {
        self.nmi_pending
    }

    /// Clear the latched NMI request.
    pub fn acknowledge_nmi(&mut self) {
        self.nmi_pending = false;
    }

    /// Whether the mapper or APU frame sequencer/DMC is asserting IRQ.
    #[must_use]
    pub fn irq_pending(&self) -> bool {
        self.mapper.irq_pending() || self.apu.irq_pending()
    }

    /// Clear a mapper-sourced IRQ (MMC3 scanline counter).
    pub fn acknowledge_mapper_irq(&mut self) {
        self.mapper.irq_acknowledge();
    }

    /// Total CPU cycles elapsed, for DMA parity and diagnostics.
    #[must_use]
    pub fn cpu_cycles(&self) -> u64 {
        self.cpu_cycles
    }

    /// Account for CPU cycles spent outside `Bus::read`/`Bus::write` (DMA,
    /// interrupt servicing).
    pub fn add_cpu_cycles(&mut self, cycles: u8) {
        self.cpu_cycles += u64::from(cycles);
    }

    /// Whether the DMC's sample-refill DMA is currently stalling the CPU.
    #[must_use]
    pub fn dmc_stall_active(&self) -> bool {
        self.dmc_stall_cycles > 0
    }

    /// Pay down one cycle of an active DMC DMA stall.
    pub fn decrement_dmc_stall(&mut self) {
        self.dmc_stall_cycles = self.dmc_stall_cycles.saturating_sub(1);
    }

    /// Non-mutating memory inspection, for debuggers and disassembly: never
    /// triggers PPU register side effects or mapper bank-switch writes.
    #[must_use]
    pub fn peek(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram[(addr & 0x07FF) as usize],
            0x2000..=0x3FFF => self.last_bus_value,
            0x4015 => self.apu.peek_status(),
            0x4000..=0x401F => self.last_bus_value,
            0x4020..=0xFFFF => self.mapper.read_prg(addr),
        }
    }
}

impl CpuBus for NesBus {
    fn read(&mut self, addr: u16) -> u8 {
        let value = match addr {
            0x0000..=0x1FFF => self.ram[(addr & 0x07FF) as usize],
            0x2000..=0x3FFF => {
                let mut mem = self.ppu_memory();
                self.ppu.read_register(addr, &mut mem)
            }
            0x4000..=0x4017 => match addr {
                0x4015 => self.apu.read_status(),
                0x4016 => self.controller1.read(),
                0x4017 => self.controller2.read(),
                _ => self.last_bus_value,
            },
            0x4018..=0x401F => self.last_bus_value,
            0x4020..=0xFFFF => self.mapper.read_prg(addr),
        };

        self.last_bus_value = value;
        value
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.last_bus_value = value;

        match addr {
            0x0000..=0x1FFF => self.ram[(addr & 0x07FF) as usize] = value,
            0x2000..=0x3FFF => {
                let mut mem = self.ppu_memory();
                self.ppu.write_register(addr, value, &mut mem);
            }
            0x4000..=0x4017 => match addr {
                0x4000..=0x4013 | 0x4015 | 0x4017 => self.apu.write_register(addr, value),
                0x4014 => self.oam_dma_page = Some(value),
                0x4016 => {
                    self.controller1.write_strobe(value);
                    self.controller2.write_strobe(value);
                }
                _ => {}
            },
            0x4018..=0x401F => {}
            0x4020..=0xFFFF => self.mapper.write_prg(addr, value),
        }
    }

    fn peek(&self, addr: u16) -> u8 {
        NesBus::peek(self, addr)
    }
}
