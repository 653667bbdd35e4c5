use std::io;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::console::Console;
use crate::decoder::Decoder;
use crate::exec::Executor;
use crate::memory::Bus;
use crate::registers::{Cond, Registers};

/// Fixed start of user program space.
pub const PC_START: u16 = 0x3000;

/// What to do with the two opcodes that have no defined operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservedOpcodePolicy {
    /// Consume the fetch and carry on.
    #[default]
    Ignore,
    /// Stop with `CpuError::IllegalOpcode`.
    Fault,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CpuConfig {
    pub entry: u16,
    pub reserved_opcodes: ReservedOpcodePolicy,
    pub step_limit: Option<u64>, // None runs until HALT
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            entry: PC_START,
            reserved_opcodes: ReservedOpcodePolicy::Ignore,
            step_limit: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Running,
    Halted,
}

#[derive(thiserror::Error, Debug)]
pub enum CpuError {
    #[error("machine is halted")]
    Halted,
    #[error("illegal opcode {opcode:#x} at {pc:#06x}")]
    IllegalOpcode { pc: u16, opcode: u8 },
    #[error("console error in trap {vector:#04x}: {source}")]
    Console {
        vector: u8,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cpu {
    pub regs: Registers,
    pub cfg: CpuConfig,
    state: RunState,
    steps: u64,
}

impl Cpu {
    /// A running CPU with PC at `cfg.entry` and COND = Z.
    pub fn new(cfg: CpuConfig) -> Self {
        let mut cpu = Self {
            regs: Registers::new(),
            cfg,
            state: RunState::Running,
            steps: 0,
        };
        cpu.reset();
        cpu
    }

    /// Clear the register file and return to the entry point. Memory is untouched.
    pub fn reset(&mut self) {
        self.regs = Registers::new();
        self.regs.set_pc(self.cfg.entry);
        self.regs.set_cond(Cond::Z);
        self.state = RunState::Running;
        self.steps = 0;
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_halted(&self) -> bool {
        self.state == RunState::Halted
    }

    pub fn halt(&mut self) {
        self.state = RunState::Halted;
    }

    /// Instructions executed since the last reset.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Fetch, advance PC, decode, execute. PC is incremented before the
    /// instruction body runs, so PC-relative offsets count from the next word.
    pub fn step<B: Bus, C: Console, D: Decoder, X: Executor>(
        &mut self,
        bus: &mut B,
        io: &mut C,
        dec: &D,
        exec: &X,
    ) -> Result<(), CpuError> {
        if self.is_halted() {
            return Err(CpuError::Halted);
        }
        let pc = self.regs.pc();
        let raw = bus.read(pc);
        self.regs.set_pc(pc.wrapping_add(1));
        let d = dec.decode(raw);
        trace!("{pc:#06x}: {raw:#06x} {:?}", d.op);
        self.steps += 1;
        exec.exec(self, bus, io, d)
    }
}
