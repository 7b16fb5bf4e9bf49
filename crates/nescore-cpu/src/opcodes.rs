//! The 256-entry opcode table.
//!
//! Unofficial opcodes are not emulated for side effects; per the simplified
//! model this crate targets, every byte not in the official instruction set
//! decodes as [`Mnemonic::Inv`] and executes as a 2-cycle, 1-byte NOP.

use crate::addressing::AddrMode;

/// Instruction mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Mnemonic {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc,
    Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp,
    Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol, Ror, Rti,
    Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
    /// Unofficial opcode, treated as a no-op.
    Inv,
}

/// Statically decoded information about one opcode byte.
#[derive(Debug, Clone, Copy)]
pub struct OpcodeInfo {
    /// Mnemonic.
    pub mnemonic: Mnemonic,
    /// Addressing mode.
    pub mode: AddrMode,
    /// Total instruction length in bytes (including the opcode byte).
    pub bytes: u8,
    /// Base cycle count, excluding any dynamic page-cross/branch penalty.
    pub cycles: u8,
    /// Whether this is a documented (official) opcode.
    pub official: bool,
}

const fn op(m: Mnemonic, mode: AddrMode, bytes: u8, cycles: u8) -> OpcodeInfo {
    OpcodeInfo { mnemonic: m, mode, bytes, cycles, official: true }
}

const INV: OpcodeInfo = OpcodeInfo {
    mnemonic: Mnemonic::Inv,
    mode: AddrMode::Implied,
    bytes: 1,
    cycles: 2,
    official: false,
};

/// Decode an opcode byte into its static instruction info.
#[must_use]
pub const fn decode(opcode: u8) -> OpcodeInfo {
    use AddrMode::{
        Absolute, AbsoluteX, AbsoluteXWrite, AbsoluteY, AbsoluteYWrite, Accumulator, Immediate,
        Implied, Indirect, IndirectX, IndirectY, IndirectYWrite, Relative, ZeroPage, ZeroPageX,
        ZeroPageY,
    };
    use Mnemonic::*;

    match opcode {
        0x00 => op(Brk, Implied, 1, 7),
        0x01 => op(Ora, IndirectX, 2, 6),
        0x05 => op(Ora, ZeroPage, 2, 3),
        0x06 => op(Asl, ZeroPage, 2, 5),
        0x08 => op(Php, Implied, 1, 3),
        0x09 => op(Ora, Immediate, 2, 2),
        0x0A => op(Asl, Accumulator, 1, 2),
        0x0D => op(Ora, Absolute, 3, 4),
        0x0E => op(Asl, Absolute, 3, 6),

        0x10 => op(Bpl, Relative, 2, 2),
        0x11 => op(Ora, IndirectY, 2, 5),
        0x15 => op(Ora, ZeroPageX, 2, 4),
        0x16 => op(Asl, ZeroPageX, 2, 6),
        0x18 => op(Clc, Implied, 1, 2),
        0x19 => op(Ora, AbsoluteY, 3, 4),
        0x1D => op(Ora, AbsoluteX, 3, 4),
        0x1E => op(Asl, AbsoluteXWrite, 3, 7),

        0x20 => op(Jsr, Absolute, 3, 6),
        0x21 => op(And, IndirectX, 2, 6),
        0x24 => op(Bit, ZeroPage, 2, 3),
        0x25 => op(And, ZeroPage, 2, 3),
        0x26 => op(Rol, ZeroPage, 2, 5),
        0x28 => op(Plp, Implied, 1, 4),
        0x29 => op(And, Immediate, 2, 2),
        0x2A => op(Rol, Accumulator, 1, 2),
        0x2C => op(Bit, Absolute, 3, 4),
        0x2D => op(And, Absolute, 3, 4),
        0x2E => op(Rol, Absolute, 3, 6),

        0x30 => op(Bmi, Relative, 2, 2),
        0x31 => op(And, IndirectY, 2, 5),
        0x35 => op(And, ZeroPageX, 2, 4),
        0x36 => op(Rol, ZeroPageX, 2, 6),
        0x38 => op(Sec, Implied, 1, 2),
        0x39 => op(And, AbsoluteY, 3, 4),
        0x3D => op(And, AbsoluteX, 3, 4),
        0x3E => op(Rol, AbsoluteXWrite, 3, 7),

        0x40 => op(Rti, Implied, 1, 6),
        0x41 => op(Eor, IndirectX, 2, 6),
        0x45 => op(Eor, ZeroPage, 2, 3),
        0x46 => op(Lsr, ZeroPage, 2, 5),
        0x48 => op(Pha, Implied, 1, 3),
        0x49 => op(Eor, Immediate, 2, 2),
        0x4A => op(Lsr, Accumulator, 1, 2),
        0x4C => op(Jmp, Absolute, 3, 3),
        0x4D => op(Eor, Absolute, 3, 4),
        0x4E => op(Lsr, Absolute, 3, 6),

        0x50 => op(Bvc, Relative, 2, 2),
        0x51 => op(Eor, IndirectY, 2, 5),
        0x55 => op(Eor, ZeroPageX, 2, 4),
        0x56 => op(Lsr, ZeroPageX, 2, 6),
        0x58 => op(Cli, Implied, 1, 2),
        0x59 => op(Eor, AbsoluteY, 3, 4),
        0x5D => op(Eor, AbsoluteX, 3, 4),
        0x5E => op(Lsr, AbsoluteXWrite, 3, 7),

        0x60 => op(Rts, Implied, 1, 6),
        0x61 => op(Adc, IndirectX, 2, 6),
        0x65 => op(Adc, ZeroPage, 2, 3),
        0x66 => op(Ror, ZeroPage, 2, 5),
        0x68 => op(Pla, Implied, 1, 4),
        0x69 => op(Adc, Immediate, 2, 2),
        0x6A => op(Ror, Accumulator, 1, 2),
        0x6C => op(Jmp, Indirect, 3, 5),
        0x6D => op(Adc, Absolute, 3, 4),
        0x6E => op(Ror, Absolute, 3, 6),

        0x70 => op(Bvs, Relative, 2, 2),
        0x71 => op(Adc, IndirectY, 2, 5),
        0x75 => op(Adc, ZeroPageX, 2, 4),
        0x76 => op(Ror, ZeroPageX, 2, 6),
        0x78 => op(Sei, Implied, 1, 2),
        0x79 => op(Adc, AbsoluteY, 3, 4),
        0x7D => op(Adc, AbsoluteX, 3, 4),
        0x7E => op(Ror, AbsoluteXWrite, 3, 7),

        0x81 => op(Sta, IndirectX, 2, 6),
        0x84 => op(Sty, ZeroPage, 2, 3),
        0x85 => op(Sta, ZeroPage, 2, 3),
        0x86 => op(Stx, ZeroPage, 2, 3),
        0x88 => op(Dey, Implied, 1, 2),
        0x8A => op(Txa, Implied, 1, 2),
        0x8C => op(Sty, Absolute, 3, 4),
        0x8D => op(Sta, Absolute, 3, 4),
        0x8E => op(Stx, Absolute, 3, 4),

        0x90 => op(Bcc, Relative, 2, 2),
        0x91 => op(Sta, IndirectYWrite, 2, 6),
        0x94 => op(Sty, ZeroPageX, 2, 4),
        0x95 => op(Sta, ZeroPageX, 2, 4),
        0x96 => op(Stx, ZeroPageY, 2, 4),
        0x98 => op(Tya, Implied, 1, 2),
        0x99 => op(Sta, AbsoluteYWrite, 3, 5),
        0x9A => op(Txs, Implied, 1, 2),
        0x9D => op(Sta, AbsoluteXWrite, 3, 5),

        0xA0 => op(Ldy, Immediate, 2, 2),
        0xA1 => op(Lda, IndirectX, 2, 6),
        0xA2 => op(Ldx, Immediate, 2, 2),
        0xA4 => op(Ldy, ZeroPage, 2, 3),
        0xA5 => op(Lda, ZeroPage, 2, 3),
        0xA6 => op(Ldx, ZeroPage, 2, 3),
        0xA8 => op(Tay, Implied, 1, 2),
        0xA9 => op(Lda, Immediate, 2, 2),
        0xAA => op(Tax, Implied, 1, 2),
        0xAC => op(Ldy, Absolute, 3, 4),
        0xAD => op(Lda, Absolute, 3, 4),
        0xAE => op(Ldx, Absolute, 3, 4),

        0xB0 => op(Bcs, Relative, 2, 2),
        0xB1 => op(Lda, IndirectY, 2, 5),
        0xB4 => op(Ldy, ZeroPageX, 2, 4),
        0xB5 => op(Lda, ZeroPageX, 2, 4),
        0xB6 => op(Ldx, ZeroPageY, 2, 4),
        0xB8 => op(Clv, Implied, 1, 2),
        0xB9 => op(Lda, AbsoluteY, 3, 4),
        0xBA => op(Tsx, Implied, 1, 2),
        0xBC => op(Ldy, AbsoluteX, 3, 4),
        0xBD => op(Lda, AbsoluteX, 3, 4),
        0xBE => op(Ldx, AbsoluteY, 3, 4),

        0xC0 => op(Cpy, Immediate, 2, 2),
        0xC1 => op(Cmp, IndirectX, 2, 6),
        0xC4 => op(Cpy, ZeroPage, 2, 3),
        0xC5 => op(Cmp, ZeroPage, 2, 3),
        0xC6 => op(Dec, ZeroPage, 2, 5),
        0xC8 => op(Iny, Implied, 1, 2),
        0xC9 => op(Cmp, Immediate, 2, 2),
        0xCA => op(Dex, Implied, 1, 2),
        0xCC => op(Cpy, Absolute, 3, 4),
        0xCD => op(Cmp, Absolute, 3, 4),
        0xCE => op(Dec, Absolute, 3, 6),

        0xD0 => op(Bne, Relative, 2, 2),
        0xD1 => op(Cmp, IndirectY, 2, 5),
        0xD5 => op(Cmp, ZeroPageX, 2, 4),
        0xD6 => op(Dec, ZeroPageX, 2, 6),
        0xD8 => op(Cld, Implied, 1, 2),
        0xD9 => op(Cmp, AbsoluteY, 3, 4),
        0xDD => op(Cmp, AbsoluteX, 3, 4),
        0xDE => op(Dec, AbsoluteXWrite, 3, 7),

        0xE0 => op(Cpx, Immediate, 2, 2),
        0xE1 => op(Sbc, IndirectX, 2, 6),
        0xE4 => op(Cpx, ZeroPage, 2, 3),
        0xE5 => op(Sbc, ZeroPage, 2, 3),
        0xE6 => op(Inc, ZeroPage, 2, 5),
        0xE8 => op(Inx, Implied, 1, 2),
        0xE9 => op(Sbc, Immediate, 2, 2),
        0xEA => op(Nop, Implied, 1, 2),
        0xEC => op(Cpx, Absolute, 3, 4),
        0xED => op(Sbc, Absolute, 3, 4),
        0xEE => op(Inc, Absolute, 3, 6),

        0xF0 => op(Beq, Relative, 2, 2),
        0xF1 => op(Sbc, IndirectY, 2, 5),
        0xF5 => op(Sbc, ZeroPageX, 2, 4),
        0xF6 => op(Inc, ZeroPageX, 2, 6),
        0xF8 => op(Sed, Implied, 1, 2),
        0xF9 => op(Sbc, AbsoluteY, 3, 4),
        0xFD => op(Sbc, AbsoluteX, 3, 4),
        0xFE => op(Inc, AbsoluteXWrite, 3, 7),

        _ => INV,
    }
}
