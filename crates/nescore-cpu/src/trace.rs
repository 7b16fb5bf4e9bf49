//! CPU execution tracing in nestest.log-compatible format.

#[cfg(not(feature = "std"))]
use alloc::{
    format,
    string::{String, ToString},
    vec::Vec,
};
#[cfg(not(feature = "std"))]
use core::fmt::Write;
#[cfg(feature = "std")]
use std::fmt::Write;

use crate::addressing::AddrMode;
use crate::bus::CpuBus;
use crate::cpu::Cpu;
use crate::opcodes::{decode, Mnemonic};

fn mnemonic_str(mnemonic: Mnemonic) -> &'static str {
    match mnemonic {
        Mnemonic::Adc => "ADC",
        Mnemonic::And => "AND",
        Mnemonic::Asl => "ASL",
        Mnemonic::Bcc => "BCC",
        Mnemonic::Bcs => "BCS",
        Mnemonic::Beq => "BEQ",
        Mnemonic::Bit => "BIT",
        Mnemonic::Bmi => "BMI",
        Mnemonic::Bne => "BNE",
        Mnemonic::Bpl => "BPL",
        Mnemonic::Brk => "BRK",
        Mnemonic::Bvc => "BVC",
        Mnemonic::Bvs => "BVS",
        Mnemonic::Clc => "CLC",
        Mnemonic::Cld => "CLD",
        Mnemonic::Cli => "CLI",
        Mnemonic::Clv => "CLV",
        Mnemonic::Cmp => "CMP",
        Mnemonic::Cpx => "CPX",
        Mnemonic::Cpy => "CPY",
        Mnemonic::Dec => "DEC",
        Mnemonic::Dex => "DEX",
        Mnemonic::Dey => "DEY",
        Mnemonic::Eor => "EOR",
        Mnemonic::Inc => "INC",
        Mnemonic::Inx => "INX",
        Mnemonic::Iny => "INY",
        Mnemonic::Jmp => "JMP",
        Mnemonic::Jsr => "JSR",
        Mnemonic::Lda => "LDA",
        Mnemonic::Ldx => "LDX",
        Mnemonic::Ldy => "LDY",
        Mnemonic::Lsr => "LSR",
        Mnemonic::Nop => "NOP",
        Mnemonic::Ora => "ORA",
        Mnemonic::Pha => "PHA",
        Mnemonic::Php => "PHP",
        Mnemonic::Pla => "PLA",
        Mnemonic::Plp => "PLP",
        Mnemonic::Rol => "ROL",
        Mnemonic::Ror => "ROR",
        Mnemonic::Rti => "RTI",
        Mnemonic::Rts => "RTS",
        Mnemonic::Sbc => "SBC",
        Mnemonic::Sec => "SEC",
        Mnemonic::Sed => "SED",
        Mnemonic::Sei => "SEI",
        Mnemonic::Sta => "STA",
        Mnemonic::Stx => "STX",
        Mnemonic::Sty => "STY",
        Mnemonic::Tax => "TAX",
        Mnemonic::Tay => "TAY",
        Mnemonic::Tsx => "TSX",
        Mnemonic::Txa => "TXA",
        Mnemonic::Txs => "TXS",
        Mnemonic::Tya => "TYA",
        Mnemonic::Inv => "NOP",
    }
}

/// One logged instruction, before it executes.
#[derive(Debug, Clone)]
pub struct TraceEntry {
    /// Program counter at the start of the instruction.
    pub pc: u16,
    /// Opcode byte.
    pub opcode: u8,
    /// Operand bytes following the opcode (0-2 bytes).
    pub operand_bytes: Vec<u8>,
    /// Disassembled instruction text.
    pub disassembly: String,
    /// Accumulator.
    pub a: u8,
    /// X register.
    pub x: u8,
    /// Y register.
    pub y: u8,
    /// Processor status, as pushed to the stack (with the B flag set).
    pub p: u8,
    /// Stack pointer.
    pub sp: u8,
    /// Total cycles executed so far.
    pub cycles: u64,
}

impl TraceEntry {
    /// Format in nestest.log layout:
    /// `PC  OPCODE BYTES   DISASM                          A:XX X:XX Y:XX P:XX SP:XX CYC:N`
    #[must_use]
    pub fn format(&self) -> String {
        let mut bytes_str = String::new();
        write!(bytes_str, "{:02X}", self.opcode).unwrap();
        for byte in &self.operand_bytes {
            write!(bytes_str, " {byte:02X}").unwrap();
        }

        let unofficial = self.disassembly.starts_with('*');
        let bytes_width = if unofficial { 9 } else { 10 };
        let disasm_width = if unofficial { 33 } else { 32 };

        format!(
            "{:04X}  {:bytes_width$}{:disasm_width$}A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
            self.pc, bytes_str, self.disassembly, self.a, self.x, self.y, self.p, self.sp, self.cycles,
        )
    }
}

/// Generates nestest.log-compatible execution traces.
#[derive(Debug, Clone, Default)]
pub struct CpuTracer {
    entries: Vec<String>,
}

impl CpuTracer {
    /// Empty tracer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log the CPU's state just before it executes its next instruction.
    ///
    /// Must be called before that instruction runs; the log format records
    /// pre-execution state.
    pub fn trace(&mut self, cpu: &Cpu, bus: &impl CpuBus) {
        let entry = self.create_entry(cpu, bus);
        self.entries.push(entry.format());
    }

    /// All logged lines, joined with newlines.
    #[must_use]
    pub fn log(&self) -> String {
        self.entries.join("\n")
    }

    /// Number of logged instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no instructions have been logged yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn create_entry(&self, cpu: &Cpu, bus: &impl CpuBus) -> TraceEntry {
        let pc = cpu.pc;
        let opcode = bus.peek(pc);
        let info = decode(opcode);

        let operand_bytes = (1..=u16::from(info.bytes.saturating_sub(1)))
            .map(|i| bus.peek(pc.wrapping_add(i)))
            .collect();

        let disassembly = disassemble(cpu, bus, pc, info.mnemonic, info.mode, info.official);

        TraceEntry {
            pc,
            opcode,
            operand_bytes,
            disassembly,
            a: cpu.a,
            x: cpu.x,
            y: cpu.y,
            p: cpu.status.to_stack_byte(false),
            sp: cpu.sp,
            cycles: cpu.total_cycles(),
        }
    }
}

/// Disassemble the instruction at `pc`, resolving its effective address and
/// the value found there (matching nestest.log's `$addr = value` annotations).
fn disassemble(
    cpu: &Cpu,
    bus: &impl CpuBus,
    pc: u16,
    mnemonic: Mnemonic,
    mode: AddrMode,
    official: bool,
) -> String {
    let name = mnemonic_str(mnemonic);
    let prefix = if official { "" } else { "*" };

    match mode {
        AddrMode::Implied => format!("{prefix}{name}"),
        AddrMode::Accumulator => format!("{prefix}{name} A"),

        AddrMode::Immediate => {
            let value = bus.peek(pc.wrapping_add(1));
            format!("{prefix}{name} #${value:02X}")
        }

        AddrMode::ZeroPage => {
            let addr = bus.peek(pc.wrapping_add(1));
            let value = bus.peek(u16::from(addr));
            format!("{prefix}{name} ${addr:02X} = {value:02X}")
        }

        AddrMode::ZeroPageX => {
            let base = bus.peek(pc.wrapping_add(1));
            let addr = base.wrapping_add(cpu.x);
            let value = bus.peek(u16::from(addr));
            format!("{prefix}{name} ${base:02X},X @ {addr:02X} = {value:02X}")
        }

        AddrMode::ZeroPageY => {
            let base = bus.peek(pc.wrapping_add(1));
            let addr = base.wrapping_add(cpu.y);
            let value = bus.peek(u16::from(addr));
            format!("{prefix}{name} ${base:02X},Y @ {addr:02X} = {value:02X}")
        }

        AddrMode::Absolute => {
            let addr = peek_u16(bus, pc.wrapping_add(1));
            if matches!(mnemonic, Mnemonic::Jmp | Mnemonic::Jsr) {
                format!("{prefix}{name} ${addr:04X}")
            } else {
                let value = bus.peek(addr);
                format!("{prefix}{name} ${addr:04X} = {value:02X}")
            }
        }

        AddrMode::AbsoluteX | AddrMode::AbsoluteXWrite => {
            let base = peek_u16(bus, pc.wrapping_add(1));
            let addr = base.wrapping_add(u16::from(cpu.x));
            let value = bus.peek(addr);
            format!("{prefix}{name} ${base:04X},X @ {addr:04X} = {value:02X}")
        }

        AddrMode::AbsoluteY | AddrMode::AbsoluteYWrite => {
            let base = peek_u16(bus, pc.wrapping_add(1));
            let addr = base.wrapping_add(u16::from(cpu.y));
            let value = bus.peek(addr);
            format!("{prefix}{name} ${base:04X},Y @ {addr:04X} = {value:02X}")
        }

        AddrMode::Indirect => {
            let ptr = peek_u16(bus, pc.wrapping_add(1));
            let target = read_u16_bugged(bus, ptr);
            format!("{prefix}{name} (${ptr:04X}) = {target:04X}")
        }

        AddrMode::IndirectX => {
            let base = bus.peek(pc.wrapping_add(1));
            let ptr = base.wrapping_add(cpu.x);
            let addr = read_u16_zp(bus, ptr);
            let value = bus.peek(addr);
            format!("{prefix}{name} (${base:02X},X) @ {ptr:02X} = {addr:04X} = {value:02X}")
        }

        AddrMode::IndirectY | AddrMode::IndirectYWrite => {
            let ptr = bus.peek(pc.wrapping_add(1));
            let base = read_u16_zp(bus, ptr);
            let addr = base.wrapping_add(u16::from(cpu.y));
            let value = bus.peek(addr);
            format!("{prefix}{name} (${ptr:02X}),Y = {base:04X} @ {addr:04X} = {value:02X}")
        }

        AddrMode::Relative => {
            let offset = bus.peek(pc.wrapping_add(1)) as i8;
            let target = pc.wrapping_add(2).wrapping_add(offset as u16);
            format!("{prefix}{name} ${target:04X}")
        }
    }
}

fn peek_u16(bus: &impl CpuBus, addr: u16) -> u16 {
    let lo = bus.peek(addr);
    let hi = bus.peek(addr.wrapping_add(1));
    u16::from_le_bytes([lo, hi])
}

fn read_u16_bugged(bus: &impl CpuBus, ptr: u16) -> u16 {
    let lo = bus.peek(ptr);
    let hi = if ptr & 0x00FF == 0x00FF {
        bus.peek(ptr & 0xFF00)
    } else {
        bus.peek(ptr.wrapping_add(1))
    };
    u16::from_le_bytes([lo, hi])
}

fn read_u16_zp(bus: &impl CpuBus, zp: u8) -> u16 {
    let lo = bus.peek(u16::from(zp));
    let hi = bus.peek(u16::from(zp.wrapping_add(1)));
    u16::from_le_bytes([lo, hi])
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestBus {
        memory: [u8; 0x10000],
    }

    impl TestBus {
        fn new() -> Self {
            Self { memory: [0; 0x10000] }
        }
    }

    impl CpuBus for TestBus {
        fn read(&mut self, addr: u16) -> u8 {
            self.memory[addr as usize]
        }
        fn write(&mut self, addr: u16, value: u8) {
            self.memory[addr as usize] = value;
        }
        fn peek(&self, addr: u16) -> u8 {
            self.memory[addr as usize]
        }
    }

    #[test]
    fn traces_immediate_load() {
        let mut cpu = Cpu::new();
        cpu.pc = 0xC000;
        cpu.sp = 0xFD;

        let mut bus = TestBus::new();
        bus.memory[0xC000] = 0xA9;
        bus.memory[0xC001] = 0x42;

        let mut tracer = CpuTracer::new();
        tracer.trace(&cpu, &bus);
        let log = tracer.log();

        assert!(log.contains("C000"));
        assert!(log.contains("A9 42"));
        assert!(log.contains("LDA #$42"));
        assert!(log.contains("SP:FD"));
    }

    #[test]
    fn traces_jmp_absolute_without_a_dereferenced_value() {
        let mut cpu = Cpu::new();
        cpu.pc = 0xC000;

        let mut bus = TestBus::new();
        bus.memory[0xC000] = 0x4C;
        bus.memory[0xC001] = 0xF5;
        bus.memory[0xC002] = 0xC5;

        let mut tracer = CpuTracer::new();
        tracer.trace(&cpu, &bus);

        assert!(tracer.log().contains("JMP $C5F5"));
    }

    #[test]
    fn unofficial_opcode_gets_star_prefix() {
        let mut cpu = Cpu::new();
        cpu.pc = 0xC000;

        let mut bus = TestBus::new();
        bus.memory[0xC000] = 0x04; // unassigned byte, decodes as Inv

        let mut tracer = CpuTracer::new();
        tracer.trace(&cpu, &bus);

        assert!(tracer.log().contains("*NOP"));
    }
}
