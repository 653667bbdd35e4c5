//! Built-in trap routines. Each routine talks to the console collaborator
//! and the CPU's R0; HALT is the only way to leave the running state.

use std::io;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::console::Console;
use crate::cpu::{Cpu, CpuError};
use crate::memory::{Bus, MEMORY_WORDS};
use crate::registers::Reg;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrapVector {
    /// 0x20: read a byte into R0, no echo.
    Getc,
    /// 0x21: write the low byte of R0.
    Out,
    /// 0x22: write one character per word from R0 up to a zero word.
    Puts,
    /// 0x23: read a byte into R0 and echo it.
    In,
    /// 0x24: write two characters per word (low byte first) from R0 up to a
    /// word whose low byte is zero. A zero high byte is skipped.
    Putsp,
    /// 0x25
    Halt,
    Unknown(u8),
}

impl TrapVector {
    pub fn from_vector(vector: u8) -> Self {
        match vector {
            0x20 => TrapVector::Getc,
            0x21 => TrapVector::Out,
            0x22 => TrapVector::Puts,
            0x23 => TrapVector::In,
            0x24 => TrapVector::Putsp,
            0x25 => TrapVector::Halt,
            other => TrapVector::Unknown(other),
        }
    }

    pub fn vector(self) -> u8 {
        match self {
            TrapVector::Getc => 0x20,
            TrapVector::Out => 0x21,
            TrapVector::Puts => 0x22,
            TrapVector::In => 0x23,
            TrapVector::Putsp => 0x24,
            TrapVector::Halt => 0x25,
            TrapVector::Unknown(v) => v,
        }
    }
}

/// Run the routine for `vector`. R7 already holds the return address.
pub fn dispatch<B: Bus, C: Console>(
    cpu: &mut Cpu,
    bus: &mut B,
    io: &mut C,
    vector: u8,
) -> Result<(), CpuError> {
    let tv = TrapVector::from_vector(vector);
    debug!("trap {vector:#04x} {tv:?}");
    let console_err = |source: io::Error| CpuError::Console { vector, source };

    match tv {
        TrapVector::Getc => {
            let ch = io.read_byte().map_err(console_err)?;
            cpu.regs.set(Reg::R0, ch as u16);
        }
        TrapVector::In => {
            let ch = io.read_byte().map_err(console_err)?;
            cpu.regs.set(Reg::R0, ch as u16);
            io.write_bytes(&[ch]).map_err(console_err)?;
            io.flush().map_err(console_err)?;
        }
        TrapVector::Out => {
            let ch = (cpu.regs.get(Reg::R0) & 0xFF) as u8;
            io.write_bytes(&[ch]).map_err(console_err)?;
            io.flush().map_err(console_err)?;
        }
        TrapVector::Puts => {
            let s = wide_string(bus, cpu.regs.get(Reg::R0));
            io.write_bytes(&s).map_err(console_err)?;
            io.flush().map_err(console_err)?;
        }
        TrapVector::Putsp => {
            let s = packed_string(bus, cpu.regs.get(Reg::R0));
            io.write_bytes(&s).map_err(console_err)?;
            io.flush().map_err(console_err)?;
        }
        TrapVector::Halt => {
            io.flush().map_err(console_err)?;
            cpu.halt();
            info!("halted after {} instruction(s)", cpu.steps());
        }
        TrapVector::Unknown(v) => {
            warn!("unknown trap vector {v:#04x} ignored");
        }
    }
    Ok(())
}

/// Addresses from `start` upward, wrapping at 0xFFFF, visiting each cell once.
fn sweep(start: u16) -> impl Iterator<Item = u16> {
    (0..MEMORY_WORDS).map(move |i| start.wrapping_add(i as u16))
}

fn wide_string<B: Bus>(bus: &B, start: u16) -> Vec<u8> {
    sweep(start)
        .map(|addr| bus.read(addr))
        .take_while(|&w| w != 0)
        .map(|w| (w & 0xFF) as u8)
        .collect()
}

fn packed_string<B: Bus>(bus: &B, start: u16) -> Vec<u8> {
    let mut out = Vec::new();
    for addr in sweep(start) {
        let w = bus.read(addr);
        let [hi, lo] = w.to_be_bytes();
        if lo == 0 {
            break;
        }
        out.push(lo);
        if hi != 0 {
            out.push(hi);
        }
    }
    out
}
