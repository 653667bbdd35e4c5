use serde::{Deserialize, Serialize};

use crate::bits::{field, sign_extend};
use crate::registers::{Cond, Reg};

/// The top four bits of an instruction word. Each defined operation gets a
/// variant; the two unassigned encodings land in `Reserved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    Br,   // 0x0
    Add,  // 0x1
    Ld,   // 0x2
    St,   // 0x3
    Jsr,  // 0x4, JSR and JSRR
    And,  // 0x5
    Ldr,  // 0x6
    Str,  // 0x7
    Not,  // 0x9
    Ldi,  // 0xA
    Sti,  // 0xB
    Jmp,  // 0xC, RET is JMP R7
    Lea,  // 0xE
    Trap, // 0xF
    Reserved(u8), // 0x8 (RTI), 0xD
}

impl Op {
    pub fn from_opcode(opcode: u8) -> Self {
        match opcode & 0xF {
            0x0 => Op::Br,
            0x1 => Op::Add,
            0x2 => Op::Ld,
            0x3 => Op::St,
            0x4 => Op::Jsr,
            0x5 => Op::And,
            0x6 => Op::Ldr,
            0x7 => Op::Str,
            0x9 => Op::Not,
            0xA => Op::Ldi,
            0xB => Op::Sti,
            0xC => Op::Jmp,
            0xE => Op::Lea,
            0xF => Op::Trap,
            other => Op::Reserved(other),
        }
    }
}

/// Fields of one instruction word, filled in per opcode. Unused fields are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoded {
    pub op: Op,
    pub rd: Reg,  // destination, bits [11:9]
    pub rs1: Reg, // first source or base register
    pub rs2: Reg, // second source, or the value register of a store
    pub imm: u16, // sign-extended immediate/offset, or the trap vector
    pub imm_mode: bool, // ADD/AND immediate form, JSR (vs JSRR)
    pub nzp: Cond,
}

pub trait Decoder {
    fn decode(&self, raw: u16) -> Decoded;
}

pub struct Lc3Decoder;

impl Lc3Decoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Lc3Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for Lc3Decoder {
    fn decode(&self, raw: u16) -> Decoded {
        let op = Op::from_opcode((raw >> 12) as u8);
        let mut d = Decoded {
            op,
            rd: Reg::R0,
            rs1: Reg::R0,
            rs2: Reg::R0,
            imm: 0,
            imm_mode: false,
            nzp: Cond::empty(),
        };

        let r_hi = Reg::new(field(raw, 9, 3));
        let r_mid = Reg::new(field(raw, 6, 3));
        let pc_offset9 = sign_extend(field(raw, 0, 9), 9);

        match op {
            Op::Add | Op::And => {
                d.rd = r_hi;
                d.rs1 = r_mid;
                d.imm_mode = field(raw, 5, 1) == 1;
                if d.imm_mode {
                    d.imm = sign_extend(field(raw, 0, 5), 5);
                } else {
                    d.rs2 = Reg::new(field(raw, 0, 3));
                }
            }
            Op::Not => {
                d.rd = r_hi;
                d.rs1 = r_mid;
            }
            Op::Br => {
                d.nzp = Cond::from_bits_truncate(field(raw, 9, 3));
                d.imm = pc_offset9;
            }
            Op::Jmp => {
                d.rs1 = r_mid;
            }
            Op::Jsr => {
                d.imm_mode = field(raw, 11, 1) == 1;
                if d.imm_mode {
                    d.imm = sign_extend(field(raw, 0, 11), 11);
                } else {
                    d.rs1 = r_mid;
                }
            }
            Op::Ld | Op::Ldi | Op::Lea => {
                d.rd = r_hi;
                d.imm = pc_offset9;
            }
            Op::Ldr => {
                d.rd = r_hi;
                d.rs1 = r_mid;
                d.imm = sign_extend(field(raw, 0, 6), 6);
            }
            Op::St | Op::Sti => {
                d.rs2 = r_hi;
                d.imm = pc_offset9;
            }
            Op::Str => {
                d.rs2 = r_hi;
                d.rs1 = r_mid;
                d.imm = sign_extend(field(raw, 0, 6), 6);
            }
            Op::Trap => {
                d.imm = field(raw, 0, 8);
            }
            Op::Reserved(_) => {}
        }
        d
    }
}
