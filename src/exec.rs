use tracing::warn;

use crate::console::Console;
use crate::cpu::{Cpu, CpuError, ReservedOpcodePolicy};
use crate::decoder::{Decoded, Op};
use crate::memory::Bus;
use crate::registers::Reg;
use crate::trap;

pub trait Executor {
    fn exec<B: Bus, C: Console>(
        &self,
        cpu: &mut Cpu,
        bus: &mut B,
        io: &mut C,
        d: Decoded,
    ) -> Result<(), CpuError>;
}

pub struct IntExecutor;
impl Executor for IntExecutor {
    fn exec<B: Bus, C: Console>(
        &self,
        cpu: &mut Cpu,
        bus: &mut B,
        io: &mut C,
        d: Decoded,
    ) -> Result<(), CpuError> {
        // pc was already advanced by fetch; every PC-relative form counts from here
        let pc = cpu.regs.pc();
        let r = &mut cpu.regs;
        match d.op {
            Op::Add => {
                let a = r.get(d.rs1);
                let b = if d.imm_mode { d.imm } else { r.get(d.rs2) };
                r.set(d.rd, a.wrapping_add(b));
                r.update_flags(d.rd);
            }
            Op::And => {
                let a = r.get(d.rs1);
                let b = if d.imm_mode { d.imm } else { r.get(d.rs2) };
                r.set(d.rd, a & b);
                r.update_flags(d.rd);
            }
            Op::Not => {
                r.set(d.rd, !r.get(d.rs1));
                r.update_flags(d.rd);
            }
            Op::Br => {
                if d.nzp.intersects(r.cond()) {
                    r.set_pc(pc.wrapping_add(d.imm));
                }
            }
            Op::Jmp => {
                r.set_pc(r.get(d.rs1));
            }
            Op::Jsr => {
                // link first: JSRR R7 lands on the return address
                r.set(Reg::R7, pc);
                let target = if d.imm_mode {
                    pc.wrapping_add(d.imm)
                } else {
                    r.get(d.rs1)
                };
                r.set_pc(target);
            }
            Op::Ld => {
                let val = bus.read(pc.wrapping_add(d.imm));
                r.set(d.rd, val);
                r.update_flags(d.rd);
            }
            Op::Ldi => {
                let ptr = bus.read(pc.wrapping_add(d.imm));
                r.set(d.rd, bus.read(ptr));
                r.update_flags(d.rd);
            }
            Op::Ldr => {
                let addr = r.get(d.rs1).wrapping_add(d.imm);
                r.set(d.rd, bus.read(addr));
                r.update_flags(d.rd);
            }
            Op::Lea => {
                r.set(d.rd, pc.wrapping_add(d.imm));
                r.update_flags(d.rd);
            }
            Op::St => {
                bus.write(pc.wrapping_add(d.imm), r.get(d.rs2));
            }
            Op::Sti => {
                let ptr = bus.read(pc.wrapping_add(d.imm));
                bus.write(ptr, r.get(d.rs2));
            }
            Op::Str => {
                let addr = r.get(d.rs1).wrapping_add(d.imm);
                bus.write(addr, r.get(d.rs2));
            }
            Op::Trap => {
                r.set(Reg::R7, pc);
                return trap::dispatch(cpu, bus, io, d.imm as u8);
            }
            Op::Reserved(opcode) => {
                let at = pc.wrapping_sub(1);
                match cpu.cfg.reserved_opcodes {
                    ReservedOpcodePolicy::Ignore => {
                        warn!("reserved opcode {opcode:#x} at {at:#06x} ignored");
                    }
                    ReservedOpcodePolicy::Fault => {
                        return Err(CpuError::IllegalOpcode { pc: at, opcode });
                    }
                }
            }
        }
        Ok(())
    }
}
