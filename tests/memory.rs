use lc3_rs::{Bus, BufferConsole, Cond, CpuConfig, Machine, Reg};
use pretty_assertions::assert_eq;

fn machine_at(entry: u16, words: &[u16]) -> Machine<BufferConsole> {
    let cfg = CpuConfig {
        entry,
        ..CpuConfig::default()
    };
    let mut vm = Machine::new(cfg, BufferConsole::new());
    vm.mem.write_block(entry, words);
    vm
}

fn enc_pc9(op: u16, r: u16, off9: i16) -> u16 {
    (op << 12) | (r << 9) | (off9 as u16 & 0x1FF)
}

fn enc_base6(op: u16, r: u16, base: u16, off6: i16) -> u16 {
    (op << 12) | (r << 9) | (base << 6) | (off6 as u16 & 0x3F)
}

#[test]
fn ld_pc_relative_sets_flags() {
    let mut vm = machine_at(0x3000, &[enc_pc9(0x2, 4, 2)]);
    vm.mem.write(0x3003, 0x8001);
    vm.step().unwrap();
    assert_eq!(vm.cpu.regs.get(Reg::new(4)), 0x8001);
    assert_eq!(vm.cpu.regs.cond(), Cond::N);
}

#[test]
fn ldi_double_indirection() {
    // instruction at 80, next PC 81, 81 + 19 = 100
    let mut vm = machine_at(80, &[enc_pc9(0xA, 1, 19)]);
    vm.mem.write(100, 200);
    vm.mem.write(200, 0x1234);
    vm.step().unwrap();
    assert_eq!(vm.cpu.regs.get(Reg::new(1)), 0x1234);
    assert_eq!(vm.cpu.regs.cond(), Cond::P);
}

#[test]
fn ldr_negative_offset() {
    let mut vm = machine_at(0x3000, &[enc_base6(0x6, 0, 2, -2)]);
    vm.cpu.regs.set(Reg::new(2), 0x4002);
    vm.mem.write(0x4000, 0);
    vm.cpu.regs.set_cond(Cond::P);
    vm.step().unwrap();
    assert_eq!(vm.cpu.regs.get(Reg::R0), 0);
    assert_eq!(vm.cpu.regs.cond(), Cond::Z);
}

#[test]
fn lea_loads_address_and_sets_flags() {
    let mut vm = machine_at(0x3000, &[enc_pc9(0xE, 5, -1)]);
    vm.step().unwrap();
    assert_eq!(vm.cpu.regs.get(Reg::new(5)), 0x3000);
    assert_eq!(vm.cpu.regs.cond(), Cond::P);
    // destination is bits [11:9], not [8:6]
    assert_eq!(vm.cpu.regs.get(Reg::R0), 0);
}

#[test]
fn st_sti_str_leave_flags_alone() {
    let mut vm = machine_at(
        0x3000,
        &[
            enc_pc9(0x3, 1, 10),     // ST R1, +10 -> 0x300B
            enc_pc9(0xB, 2, 10),     // STI R2, [0x300C]
            enc_base6(0x7, 3, 4, 5), // STR R3, R4, #5
        ],
    );
    vm.cpu.regs.set(Reg::new(1), 0xAAAA);
    vm.cpu.regs.set(Reg::new(2), 0xBBBB);
    vm.cpu.regs.set(Reg::new(3), 0xCCCC);
    vm.cpu.regs.set(Reg::new(4), 0x5000);
    vm.mem.write(0x300C, 0x6000);

    for _ in 0..3 {
        vm.step().unwrap();
    }
    assert_eq!(vm.mem.read(0x300B), 0xAAAA);
    assert_eq!(vm.mem.read(0x6000), 0xBBBB);
    assert_eq!(vm.mem.read(0x5005), 0xCCCC);
    assert_eq!(vm.cpu.regs.cond(), Cond::Z);
}

#[test]
fn ldr_address_wraps() {
    let mut vm = machine_at(0x3000, &[enc_base6(0x6, 1, 2, 3)]);
    vm.cpu.regs.set(Reg::new(2), 0xFFFF);
    vm.mem.write(0x0002, 0x0042);
    vm.step().unwrap();
    assert_eq!(vm.cpu.regs.get(Reg::new(1)), 0x0042);
}
