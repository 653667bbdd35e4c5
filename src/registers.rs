use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
/// Condition codes. Exactly one is set after any flag-updating instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cond: u16 {
const P = 1 << 0; // Positive
const Z = 1 << 1; // Zero
const N = 1 << 2; // Negative
}
}

impl Cond {
    /// Classify a register value.
    pub fn of(val: u16) -> Self {
        if val == 0 {
            Cond::Z
        } else if val >> 15 == 1 {
            Cond::N
        } else {
            Cond::P
        }
    }
}

/// General-purpose register index, always in 0..=7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reg(u8);

impl Reg {
    pub const R0: Reg = Reg(0);
    pub const R7: Reg = Reg(7);

    /// Low three bits select the register.
    pub fn new(idx: u16) -> Self {
        Reg((idx & 0x7) as u8)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// R0..R7 plus PC and COND. PC and COND are only reachable through their
/// own accessors, never through a decoded register field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers {
    gpr: [u16; 8],
    pc: u16,
    cond: Cond,
}

impl Registers {
    pub fn new() -> Self {
        Self {
            gpr: [0; 8],
            pc: 0,
            cond: Cond::Z,
        }
    }

    pub fn get(&self, r: Reg) -> u16 {
        self.gpr[r.index()]
    }

    pub fn set(&mut self, r: Reg, val: u16) {
        self.gpr[r.index()] = val;
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
    }

    pub fn cond(&self) -> Cond {
        self.cond
    }

    pub fn set_cond(&mut self, cond: Cond) {
        self.cond = cond;
    }

    /// Set COND from the value currently held in `r`.
    pub fn update_flags(&mut self, r: Reg) {
        self.cond = Cond::of(self.get(r));
    }

    pub fn gprs(&self) -> &[u16; 8] {
        &self.gpr
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}
