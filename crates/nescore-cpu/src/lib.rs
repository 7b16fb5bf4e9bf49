//! Cycle-counted MOS 6502 CPU core.
//!
//! This crate implements the register file, addressing modes, and
//! instruction set of the 6502 as used in the Ricoh 2A03 (no binary-coded
//! decimal, no external interrupt pin). It is driven one cycle at a time
//! through [`Cpu::clock`] against a [`CpuBus`] implementation supplied by
//! the host system; this crate has no notion of PPU/APU/mapper timing of
//! its own.
//!
//! Unofficial opcodes are not emulated for their side effects. They decode
//! to [`opcodes::Mnemonic::Inv`] and execute as a 2-cycle NOP, which keeps
//! program counters moving through them without modelling undocumented
//! hardware behavior test ROMs rarely rely on.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod addressing;
pub mod bus;
pub mod cpu;
pub mod opcodes;
pub mod status;
pub mod trace;
pub mod vectors;

pub use addressing::AddrMode;
pub use bus::CpuBus;
pub use cpu::Cpu;
pub use opcodes::{decode, Mnemonic, OpcodeInfo};
pub use status::Status;
pub use trace::{CpuTracer, TraceEntry};

#[cfg(test)]
mod tests {
    use super::*;

    /// A flat 64KiB RAM bus for unit tests; every address is backed by RAM
    /// with no mapper or PPU/APU semantics.
    struct TestBus {
        ram: [u8; 0x10000],
    }

    impl TestBus {
        fn new() -> Self {
            Self { ram: [0; 0x10000] }
        }

        fn load(&mut self, addr: u16, program: &[u8]) {
            for (i, &byte) in program.iter().enumerate() {
                self.ram[addr as usize + i] = byte;
            }
        }
    }

    impl CpuBus for TestBus {
        fn read(&mut self, addr: u16) -> u8 {
            self.ram[addr as usize]
        }

        fn write(&mut self, addr: u16, value: u8) {
            self.ram[addr as usize] = value;
        }

        fn peek(&self, addr: u16) -> u8 {
            self.ram[addr as usize]
        }
    }

    fn run_reset(bus: &mut TestBus, entry: u16) -> Cpu {
        bus.load(vectors::RESET, &entry.to_le_bytes());
        let mut cpu = Cpu::new();
        cpu.reset(bus);
        cpu
    }

    fn run_until_idle(cpu: &mut Cpu, bus: &mut TestBus, instructions: usize) {
        for _ in 0..instructions {
            cpu.clock(bus);
            while cpu.is_mid_instruction() {
                cpu.clock(bus);
            }
        }
    }

    #[test]
    fn reset_loads_vector_and_charges_seven_cycles() {
        let mut bus = TestBus::new();
        let cpu = run_reset(&mut bus, 0xC000);
        assert_eq!(cpu.pc, 0xC000);
        assert_eq!(cpu.sp, 0xFD);
        assert_eq!(cpu.total_cycles(), 7);
        assert!(!cpu.is_mid_instruction());
    }

    #[test]
    fn lda_immediate_sets_accumulator_and_flags() {
        let mut bus = TestBus::new();
        bus.load(0xC000, &[0xA9, 0x00]); // LDA #$00
        let mut cpu = run_reset(&mut bus, 0xC000);
        run_until_idle(&mut cpu, &mut bus, 1);
        assert_eq!(cpu.a, 0);
        assert!(cpu.status.contains(Status::ZERO));
    }

    #[test]
    fn adc_sets_carry_and_overflow_on_signed_wrap() {
        let mut bus = TestBus::new();
        bus.load(0xC000, &[0xA9, 0x7F, 0x69, 0x01]); // LDA #$7F; ADC #$01
        let mut cpu = run_reset(&mut bus, 0xC000);
        run_until_idle(&mut cpu, &mut bus, 2);
        assert_eq!(cpu.a, 0x80);
        assert!(cpu.status.contains(Status::OVERFLOW));
        assert!(cpu.status.contains(Status::NEGATIVE));
        assert!(!cpu.status.contains(Status::CARRY));
    }

    #[test]
    fn sta_absolute_writes_memory() {
        let mut bus = TestBus::new();
        bus.load(0xC000, &[0xA9, 0x42, 0x8D, 0x00, 0x02]); // LDA #$42; STA $0200
        let mut cpu = run_reset(&mut bus, 0xC000);
        run_until_idle(&mut cpu, &mut bus, 2);
        assert_eq!(bus.peek(0x0200), 0x42);
    }

    #[test]
    fn branch_not_taken_costs_two_cycles_total() {
        let mut bus = TestBus::new();
        bus.load(0xC000, &[0xA9, 0x01, 0xF0, 0x10]); // LDA #$01; BEQ +16 (not taken)
        let mut cpu = run_reset(&mut bus, 0xC000);
        run_until_idle(&mut cpu, &mut bus, 1);
        let before = cpu.total_cycles();
        run_until_idle(&mut cpu, &mut bus, 1);
        assert_eq!(cpu.total_cycles() - before, 2);
        assert_eq!(cpu.pc, 0xC004);
    }

    #[test]
    fn branch_taken_across_page_costs_four_cycles() {
        let mut bus = TestBus::new();
        // BEQ with a large positive offset that crosses into the next page.
        bus.load(0xC0FD, &[0xF0, 0x7F]); // at $C0FD, BEQ +127 -> target $C180
        let mut cpu = run_reset(&mut bus, 0xC0FD);
        cpu.status.insert(Status::ZERO);
        let before = cpu.total_cycles();
        run_until_idle(&mut cpu, &mut bus, 1);
        assert_eq!(cpu.total_cycles() - before, 4);
        assert_eq!(cpu.pc, 0xC180);
    }

    #[test]
    fn jsr_then_rts_round_trips_program_counter() {
        let mut bus = TestBus::new();
        bus.load(0xC000, &[0x20, 0x00, 0xD0]); // JSR $D000
        bus.load(0xD000, &[0x60]); // RTS
        let mut cpu = run_reset(&mut bus, 0xC000);
        run_until_idle(&mut cpu, &mut bus, 1);
        assert_eq!(cpu.pc, 0xD000);
        run_until_idle(&mut cpu, &mut bus, 1);
        assert_eq!(cpu.pc, 0xC003);
    }

    #[test]
    fn brk_pushes_break_flag_and_loads_irq_vector() {
        let mut bus = TestBus::new();
        bus.load(vectors::IRQ, &0xE000u16.to_le_bytes());
        bus.load(0xC000, &[0x00]); // BRK
        let mut cpu = run_reset(&mut bus, 0xC000);
        run_until_idle(&mut cpu, &mut bus, 1);
        assert_eq!(cpu.pc, 0xE000);
        let pushed_status = bus.peek(0x0100 + u16::from(cpu.sp.wrapping_add(1)));
        assert_ne!(pushed_status & Status::BREAK.bits(), 0);
    }

    #[test]
    fn nmi_is_serviced_between_instructions() {
        let mut bus = TestBus::new();
        bus.load(vectors::NMI, &0xF000u16.to_le_bytes());
        bus.load(0xC000, &[0xEA, 0xEA]); // NOP; NOP
        let mut cpu = run_reset(&mut bus, 0xC000);
        run_until_idle(&mut cpu, &mut bus, 1);
        cpu.request_nmi();
        run_until_idle(&mut cpu, &mut bus, 1);
        assert_eq!(cpu.pc, 0xF000);
    }

    #[test]
    fn indirect_jmp_replicates_page_wrap_bug() {
        let mut bus = TestBus::new();
        bus.load(0xC000, &[0x6C, 0xFF, 0xC1]); // JMP ($C1FF)
        bus.write(0xC1FF, 0x34);
        bus.write(0xC100, 0x12); // high byte taken from $C100, not $C200
        let mut cpu = run_reset(&mut bus, 0xC000);
        run_until_idle(&mut cpu, &mut bus, 1);
        assert_eq!(cpu.pc, 0x1234);
    }

    #[test]
    fn unofficial_opcode_behaves_as_nop() {
        let mut bus = TestBus::new();
        bus.load(0xC000, &[0x04, 0xEA]); // unofficial $04, then NOP
        let mut cpu = run_reset(&mut bus, 0xC000);
        let before = cpu.a;
        run_until_idle(&mut cpu, &mut bus, 1);
        assert_eq!(cpu.a, before);
        assert_eq!(cpu.pc, 0xC001);
    }
}
