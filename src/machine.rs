use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::console::Console;
use crate::cpu::{Cpu, CpuConfig, CpuError, RunState};
use crate::decoder::Lc3Decoder;
use crate::exec::IntExecutor;
use crate::loader::{self, LoadError, LoadedImage};
use crate::memory::{Bus, Memory};
use crate::registers::Cond;

/// How a call to [`Machine::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    Halted { steps: u64 },
    StepLimit { steps: u64 },
}

/// Register-level view of a machine, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub r: [u16; 8],
    pub pc: u16,
    pub cond: Cond,
    pub state: RunState,
    pub steps: u64,
}

/// One CPU with its own memory and console. Nothing is shared between
/// machines.
pub struct Machine<C: Console, B: Bus = Memory> {
    pub cpu: Cpu,
    pub mem: B,
    pub console: C,
    dec: Lc3Decoder,
    exec: IntExecutor,
}

impl<C: Console> Machine<C, Memory> {
    pub fn new(cfg: CpuConfig, console: C) -> Self {
        Self::with_bus(cfg, Memory::new(), console)
    }
}

impl<C: Console, B: Bus> Machine<C, B> {
    pub fn with_bus(cfg: CpuConfig, mem: B, console: C) -> Self {
        Self {
            cpu: Cpu::new(cfg),
            mem,
            console,
            dec: Lc3Decoder::new(),
            exec: IntExecutor,
        }
    }

    pub fn load_image(&mut self, bytes: &[u8]) -> Result<LoadedImage, LoadError> {
        loader::load_image(&mut self.mem, bytes)
    }

    pub fn load_image_file(&mut self, path: &Path) -> Result<LoadedImage, LoadError> {
        loader::load_image_file(&mut self.mem, path)
    }

    pub fn is_halted(&self) -> bool {
        self.cpu.is_halted()
    }

    pub fn step(&mut self) -> Result<(), CpuError> {
        self.cpu
            .step(&mut self.mem, &mut self.console, &self.dec, &self.exec)
    }

    /// Step until HALT or, if configured, the step limit.
    pub fn run(&mut self) -> Result<RunOutcome, CpuError> {
        let limit = self.cpu.cfg.step_limit;
        let mut executed = 0u64;
        while !self.cpu.is_halted() {
            if limit.is_some_and(|max| executed >= max) {
                return Ok(RunOutcome::StepLimit {
                    steps: self.cpu.steps(),
                });
            }
            self.step()?;
            executed += 1;
        }
        Ok(RunOutcome::Halted {
            steps: self.cpu.steps(),
        })
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            r: *self.cpu.regs.gprs(),
            pc: self.cpu.regs.pc(),
            cond: self.cpu.regs.cond(),
            state: self.cpu.state(),
            steps: self.cpu.steps(),
        }
    }
}
