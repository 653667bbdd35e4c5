use serde::{Deserialize, Serialize};

/// Number of addressable 16-bit cells.
pub const MEMORY_WORDS: usize = 1 << 16;

/// Word-addressed memory as seen by the CPU. Addresses are 16 bits wide and
/// cover the whole space, so accesses cannot fall outside it.
pub trait Bus {
    fn read(&self, addr: u16) -> u16;
    fn write(&mut self, addr: u16, val: u16);
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Memory {
    cells: Vec<u16>,
}

impl Memory {
    pub fn new() -> Self {
        Self {
            cells: vec![0; MEMORY_WORDS],
        }
    }

    /// Copy `words` in starting at `origin`, wrapping past 0xFFFF.
    pub fn write_block(&mut self, origin: u16, words: &[u16]) {
        let mut addr = origin;
        for &w in words {
            self.write(addr, w);
            addr = addr.wrapping_add(1);
        }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let used = self.cells.iter().filter(|&&w| w != 0).count();
        f.debug_struct("Memory").field("nonzero_cells", &used).finish()
    }
}

impl Bus for Memory {
    fn read(&self, addr: u16) -> u16 {
        self.cells[addr as usize]
    }
    fn write(&mut self, addr: u16, val: u16) {
        self.cells[addr as usize] = val;
    }
}
