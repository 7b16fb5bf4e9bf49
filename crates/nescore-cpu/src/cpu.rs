//! The 6502 core: registers, instruction execution, and the cycle clock.

use crate::addressing::AddrMode;
use crate::bus::CpuBus;
use crate::opcodes::{decode, Mnemonic};
use crate::status::Status;
use crate::vectors;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Charge, in CPU cycles, for servicing RESET/NMI/IRQ/BRK.
const INTERRUPT_CYCLES: u32 = 7;

/// A resolved instruction operand.
enum Operand {
    /// No memory operand (implied, or the accumulator).
    None,
    /// A memory address to read from / write to.
    Address(u16),
}

/// The MOS 6502 (Ricoh 2A03 variant, no decimal mode) register file and
/// execution engine.
///
/// Driven one CPU cycle at a time via [`Cpu::clock`]: instructions do not
/// execute incrementally dot-by-dot like the PPU does, they execute in full
/// on the cycle their operand fetch completes, and the remaining cycles of
/// that instruction are paid for by doing nothing on subsequent clocks. This
/// matches how the rest of the system only needs cycle-accurate *timing*,
/// not cycle-accurate bus activity during an instruction.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cpu {
    /// Accumulator.
    pub a: u8,
    /// X index register.
    pub x: u8,
    /// Y index register.
    pub y: u8,
    /// Stack pointer (offset into page 1).
    pub sp: u8,
    /// Program counter.
    pub pc: u16,
    /// Processor status flags.
    pub status: Status,
    /// Cycles left to "pay" before the next instruction may execute.
    cycles_remaining: u32,
    /// Total cycles executed since power-on, for diagnostics and sync.
    total_cycles: u64,
    /// Latched edge-triggered NMI request.
    nmi_pending: bool,
    /// Level-triggered IRQ line, asserted by mappers/APU while held.
    irq_line: bool,
}

impl Default for Cpu {
    fn default() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFD,
            pc: 0,
            status: crate::status::POWER_ON,
            cycles_remaining: 0,
            total_cycles: 0,
            nmi_pending: false,
            irq_line: false,
        }
    }
}

impl Cpu {
    /// Construct a CPU in its power-on state. Call [`Cpu::reset`] before
    /// clocking it to load the program counter from the reset vector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total cycles executed since this CPU was created.
    #[must_use]
    pub const fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    /// Whether the instruction in flight still has cycles left to pay for.
    #[must_use]
    pub const fn is_mid_instruction(&self) -> bool {
        self.cycles_remaining > 0
    }

    /// Assert or release the level-triggered IRQ line.
    pub fn set_irq_line(&mut self, asserted: bool) {
        self.irq_line = asserted;
    }

    /// Latch an edge-triggered NMI request.
    pub fn request_nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// RESET: SP -= 3 (conventionally reported as loading 0xFD from power-on),
    /// IRQ_DISABLE set, PC loaded from the reset vector. Charges the 7-cycle
    /// reset sequence immediately.
    pub fn reset(&mut self, bus: &mut impl CpuBus) {
        self.sp = 0xFD;
        self.status = crate::status::POWER_ON;
        self.pc = read_u16(bus, vectors::RESET);
        self.cycles_remaining = 0;
        self.total_cycles += u64::from(INTERRUPT_CYCLES);
        self.nmi_pending = false;
        self.irq_line = false;
    }

    /// Advance by one CPU cycle.
    ///
    /// If the current instruction (or interrupt sequence) still owes cycles,
    /// this just pays one down. Otherwise it services a pending interrupt or
    /// fetches, decodes, and fully executes the next instruction, charging
    /// its total cycle cost (base cycles plus any page-cross/branch penalty)
    /// to `cycles_remaining`.
    pub fn clock(&mut self, bus: &mut impl CpuBus) {
        self.total_cycles += 1;

        if self.cycles_remaining > 0 {
            self.cycles_remaining -= 1;
            return;
        }

        if self.nmi_pending {
            self.nmi_pending = false;
            self.service_interrupt(bus, vectors::NMI, false);
            return;
        }

        if self.irq_line && !self.status.contains(Status::IRQ_DISABLE) {
            self.service_interrupt(bus, vectors::IRQ, false);
            return;
        }

        let cycles = self.step_instruction(bus);
        self.cycles_remaining = cycles.saturating_sub(1);
    }

    fn service_interrupt(&mut self, bus: &mut impl CpuBus, vector: u16, brk: bool) {
        push(bus, &mut self.sp, (self.pc >> 8) as u8);
        push(bus, &mut self.sp, (self.pc & 0xFF) as u8);
        push(bus, &mut self.sp, self.status.to_stack_byte(brk));
        self.status.insert(Status::IRQ_DISABLE);
        self.pc = read_u16(bus, vector);
        self.cycles_remaining = INTERRUPT_CYCLES - 1;
    }

    /// Fetch, decode, and execute one instruction. Returns its total cycle cost.
    fn step_instruction(&mut self, bus: &mut impl CpuBus) -> u32 {
        let opcode = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        let info = decode(opcode);

        let mut cycles = u32::from(info.cycles);
        let (operand, page_crossed) = self.resolve_operand(bus, info.mode);
        if page_crossed && info.mode.has_page_cross_penalty() {
            cycles += 1;
        }

        let branch_extra = self.execute(bus, info.mnemonic, info.mode, operand);
        cycles += branch_extra;
        cycles
    }

    /// Resolve the addressing mode into an operand address (if any) and
    /// whether a page boundary was crossed while computing it.
    fn resolve_operand(&mut self, bus: &mut impl CpuBus, mode: AddrMode) -> (Operand, bool) {
        match mode {
            AddrMode::Implied | AddrMode::Accumulator => (Operand::None, false),
            AddrMode::Immediate => {
                let addr = self.pc;
                self.pc = self.pc.wrapping_add(1);
                (Operand::Address(addr), false)
            }
            AddrMode::Relative => {
                let addr = self.pc;
                self.pc = self.pc.wrapping_add(1);
                (Operand::Address(addr), false)
            }
            AddrMode::ZeroPage => {
                let addr = u16::from(self.fetch_byte(bus));
                (Operand::Address(addr), false)
            }
            AddrMode::ZeroPageX => {
                let base = self.fetch_byte(bus);
                let addr = u16::from(base.wrapping_add(self.x));
                (Operand::Address(addr), false)
            }
            AddrMode::ZeroPageY => {
                let base = self.fetch_byte(bus);
                let addr = u16::from(base.wrapping_add(self.y));
                (Operand::Address(addr), false)
            }
            AddrMode::Absolute => {
                let addr = self.fetch_word(bus);
                (Operand::Address(addr), false)
            }
            AddrMode::AbsoluteX | AddrMode::AbsoluteXWrite => {
                let base = self.fetch_word(bus);
                let addr = base.wrapping_add(u16::from(self.x));
                (Operand::Address(addr), page_crossed(base, addr))
            }
            AddrMode::AbsoluteY | AddrMode::AbsoluteYWrite => {
                let base = self.fetch_word(bus);
                let addr = base.wrapping_add(u16::from(self.y));
                (Operand::Address(addr), page_crossed(base, addr))
            }
            AddrMode::Indirect => {
                let ptr = self.fetch_word(bus);
                (Operand::Address(read_u16_bugged(bus, ptr)), false)
            }
            AddrMode::IndirectX => {
                let zp = self.fetch_byte(bus).wrapping_add(self.x);
                let addr = read_u16_zp(bus, zp);
                (Operand::Address(addr), false)
            }
            AddrMode::IndirectY | AddrMode::IndirectYWrite => {
                let zp = self.fetch_byte(bus);
                let base = read_u16_zp(bus, zp);
                let addr = base.wrapping_add(u16::from(self.y));
                (Operand::Address(addr), page_crossed(base, addr))
            }
        }
    }

    fn fetch_byte(&mut self, bus: &mut impl CpuBus) -> u8 {
        let value = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        value
    }

    fn fetch_word(&mut self, bus: &mut impl CpuBus) -> u16 {
        let lo = self.fetch_byte(bus);
        let hi = self.fetch_byte(bus);
        u16::from_le_bytes([lo, hi])
    }

    /// Execute the decoded instruction. Returns any extra cycles owed for a
    /// taken branch (1 for same page, 2 for a page crossing).
    #[allow(clippy::too_many_lines)]
    fn execute(
        &mut self,
        bus: &mut impl CpuBus,
        mnemonic: Mnemonic,
        mode: AddrMode,
        operand: Operand,
    ) -> u32 {
        let addr = match operand {
            Operand::Address(addr) => addr,
            Operand::None => 0,
        };

        match mnemonic {
            Mnemonic::Lda => {
                self.a = bus.read(addr);
                self.status.set_zn(self.a);
            }
            Mnemonic::Ldx => {
                self.x = bus.read(addr);
                self.status.set_zn(self.x);
            }
            Mnemonic::Ldy => {
                self.y = bus.read(addr);
                self.status.set_zn(self.y);
            }
            Mnemonic::Sta => bus.write(addr, self.a),
            Mnemonic::Stx => bus.write(addr, self.x),
            Mnemonic::Sty => bus.write(addr, self.y),
            Mnemonic::Tax => {
                self.x = self.a;
                self.status.set_zn(self.x);
            }
            Mnemonic::Tay => {
                self.y = self.a;
                self.status.set_zn(self.y);
            }
            Mnemonic::Txa => {
                self.a = self.x;
                self.status.set_zn(self.a);
            }
            Mnemonic::Tya => {
                self.a = self.y;
                self.status.set_zn(self.a);
            }
            Mnemonic::Tsx => {
                self.x = self.sp;
                self.status.set_zn(self.x);
            }
            Mnemonic::Txs => self.sp = self.x,
            Mnemonic::Pha => push(bus, &mut self.sp, self.a),
            Mnemonic::Php => push(bus, &mut self.sp, self.status.to_stack_byte(true)),
            Mnemonic::Pla => {
                self.a = pull(bus, &mut self.sp);
                self.status.set_zn(self.a);
            }
            Mnemonic::Plp => self.status = Status::from_stack_byte(pull(bus, &mut self.sp)),
            Mnemonic::Adc => self.adc(bus.read(addr)),
            Mnemonic::Sbc => self.adc(!bus.read(addr)),
            Mnemonic::And => {
                self.a &= bus.read(addr);
                self.status.set_zn(self.a);
            }
            Mnemonic::Ora => {
                self.a |= bus.read(addr);
                self.status.set_zn(self.a);
            }
            Mnemonic::Eor => {
                self.a ^= bus.read(addr);
                self.status.set_zn(self.a);
            }
            Mnemonic::Bit => {
                let value = bus.read(addr);
                self.status.set(Status::ZERO, self.a & value == 0);
                self.status.set(Status::OVERFLOW, value & 0x40 != 0);
                self.status.set(Status::NEGATIVE, value & 0x80 != 0);
            }
            Mnemonic::Cmp => self.compare(self.a, bus.read(addr)),
            Mnemonic::Cpx => self.compare(self.x, bus.read(addr)),
            Mnemonic::Cpy => self.compare(self.y, bus.read(addr)),
            Mnemonic::Inx => {
                self.x = self.x.wrapping_add(1);
                self.status.set_zn(self.x);
            }
            Mnemonic::Iny => {
                self.y = self.y.wrapping_add(1);
                self.status.set_zn(self.y);
            }
            Mnemonic::Dex => {
                self.x = self.x.wrapping_sub(1);
                self.status.set_zn(self.x);
            }
            Mnemonic::Dey => {
                self.y = self.y.wrapping_sub(1);
                self.status.set_zn(self.y);
            }
            Mnemonic::Inc => {
                let value = bus.read(addr).wrapping_add(1);
                bus.write(addr, value);
                self.status.set_zn(value);
            }
            Mnemonic::Dec => {
                let value = bus.read(addr).wrapping_sub(1);
                bus.write(addr, value);
                self.status.set_zn(value);
            }
            Mnemonic::Asl => self.shift(bus, mode, addr, |_c, v| {
                let carry = v & 0x80 != 0;
                (v << 1, carry)
            }),
            Mnemonic::Lsr => self.shift(bus, mode, addr, |_c, v| {
                let carry = v & 0x01 != 0;
                (v >> 1, carry)
            }),
            Mnemonic::Rol => self.shift(bus, mode, addr, |c, v| {
                let carry = v & 0x80 != 0;
                ((v << 1) | u8::from(c), carry)
            }),
            Mnemonic::Ror => self.shift(bus, mode, addr, |c, v| {
                let carry = v & 0x01 != 0;
                ((v >> 1) | (u8::from(c) << 7), carry)
            }),
            Mnemonic::Jmp => self.pc = addr,
            Mnemonic::Jsr => {
                let ret = self.pc.wrapping_sub(1);
                push(bus, &mut self.sp, (ret >> 8) as u8);
                push(bus, &mut self.sp, (ret & 0xFF) as u8);
                self.pc = addr;
            }
            Mnemonic::Rts => {
                let lo = pull(bus, &mut self.sp);
                let hi = pull(bus, &mut self.sp);
                self.pc = u16::from_le_bytes([lo, hi]).wrapping_add(1);
            }
            Mnemonic::Rti => {
                self.status = Status::from_stack_byte(pull(bus, &mut self.sp));
                let lo = pull(bus, &mut self.sp);
                let hi = pull(bus, &mut self.sp);
                self.pc = u16::from_le_bytes([lo, hi]);
            }
            Mnemonic::Brk => {
                self.pc = self.pc.wrapping_add(1);
                self.service_interrupt(bus, vectors::IRQ, true);
            }
            Mnemonic::Clc => self.status.remove(Status::CARRY),
            Mnemonic::Sec => self.status.insert(Status::CARRY),
            Mnemonic::Cli => self.status.remove(Status::IRQ_DISABLE),
            Mnemonic::Sei => self.status.insert(Status::IRQ_DISABLE),
            Mnemonic::Cld => self.status.remove(Status::DECIMAL),
            Mnemonic::Sed => self.status.insert(Status::DECIMAL),
            Mnemonic::Clv => self.status.remove(Status::OVERFLOW),
            Mnemonic::Nop | Mnemonic::Inv => {}
            Mnemonic::Bpl => return self.branch(bus, !self.status.contains(Status::NEGATIVE), addr),
            Mnemonic::Bmi => return self.branch(bus, self.status.contains(Status::NEGATIVE), addr),
            Mnemonic::Bvc => return self.branch(bus, !self.status.contains(Status::OVERFLOW), addr),
            Mnemonic::Bvs => return self.branch(bus, self.status.contains(Status::OVERFLOW), addr),
            Mnemonic::Bcc => return self.branch(bus, !self.status.contains(Status::CARRY), addr),
            Mnemonic::Bcs => return self.branch(bus, self.status.contains(Status::CARRY), addr),
            Mnemonic::Bne => return self.branch(bus, !self.status.contains(Status::ZERO), addr),
            Mnemonic::Beq => return self.branch(bus, self.status.contains(Status::ZERO), addr),
        }
        0
    }

    fn adc(&mut self, value: u8) {
        let carry_in = u16::from(self.status.contains(Status::CARRY));
        let sum = u16::from(self.a) + u16::from(value) + carry_in;
        let result = sum as u8;
        let overflow = (!(self.a ^ value) & (self.a ^ result) & 0x80) != 0;
        self.status.set(Status::CARRY, sum > 0xFF);
        self.status.set(Status::OVERFLOW, overflow);
        self.a = result;
        self.status.set_zn(self.a);
    }

    fn compare(&mut self, register: u8, value: u8) {
        let result = register.wrapping_sub(value);
        self.status.set(Status::CARRY, register >= value);
        self.status.set_zn(result);
    }

    fn shift(
        &mut self,
        bus: &mut impl CpuBus,
        mode: AddrMode,
        addr: u16,
        op: impl Fn(bool, u8) -> (u8, bool),
    ) {
        let carry_in = self.status.contains(Status::CARRY);
        if mode == AddrMode::Accumulator {
            let (result, carry_out) = op(carry_in, self.a);
            self.a = result;
            self.status.set(Status::CARRY, carry_out);
            self.status.set_zn(self.a);
        } else {
            let value = bus.read(addr);
            let (result, carry_out) = op(carry_in, value);
            bus.write(addr, result);
            self.status.set(Status::CARRY, carry_out);
            self.status.set_zn(result);
        }
    }

    /// Apply a branch: `offset_addr` is the address of the signed relative
    /// offset byte; `self.pc` already points past it. Returns the extra
    /// cycle cost (1 if taken, 2 if taken across a page boundary).
    fn branch(&mut self, bus: &mut impl CpuBus, taken: bool, offset_addr: u16) -> u32 {
        if !taken {
            return 0;
        }
        let offset = bus.read(offset_addr) as i8;
        let base = self.pc;
        let target = base.wrapping_add(offset as u16);
        self.pc = target;
        if page_crossed(base, target) {
            2
        } else {
            1
        }
    }
}

fn page_crossed(base: u16, addr: u16) -> bool {
    (base & 0xFF00) != (addr & 0xFF00)
}

fn push(bus: &mut impl CpuBus, sp: &mut u8, value: u8) {
    bus.write(vectors::STACK_BASE + u16::from(*sp), value);
    *sp = sp.wrapping_sub(1);
}

fn pull(bus: &mut impl CpuBus, sp: &mut u8) -> u8 {
    *sp = sp.wrapping_add(1);
    bus.read(vectors::STACK_BASE + u16::from(*sp))
}

fn read_u16(bus: &mut impl CpuBus, addr: u16) -> u16 {
    let lo = bus.read(addr);
    let hi = bus.read(addr.wrapping_add(1));
    u16::from_le_bytes([lo, hi])
}

/// Absolute indirect read with the 6502's page-wrap bug: if the pointer's low
/// byte is 0xFF, the high byte is fetched from the start of the *same* page.
fn read_u16_bugged(bus: &mut impl CpuBus, ptr: u16) -> u16 {
    let lo = bus.read(ptr);
    let hi_addr = (ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF);
    let hi = bus.read(hi_addr);
    u16::from_le_bytes([lo, hi])
}

fn read_u16_zp(bus: &mut impl CpuBus, zp: u8) -> u16 {
    let lo = bus.read(u16::from(zp));
    let hi = bus.read(u16::from(zp.wrapping_add(1)));
    u16::from_le_bytes([lo, hi])
}
