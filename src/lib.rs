pub mod bits;
pub mod console;
pub mod cpu;
pub mod decoder;
pub mod exec;
pub mod loader;
pub mod machine;
pub mod memory;
pub mod registers;
pub mod trap;

pub use console::{BufferConsole, Console, StdConsole};
pub use cpu::{Cpu, CpuConfig, CpuError, ReservedOpcodePolicy, RunState, PC_START};
pub use loader::{LoadError, LoadedImage};
pub use machine::{Machine, RunOutcome, Snapshot};
pub use memory::{Bus, Memory};
pub use registers::{Cond, Reg, Registers};
