use std::collections::HashMap;

use crate::config::arch_config::WordType;

/// Sparse byte-addressed RAM. Untouched bytes are absent and read as `None`,
/// so the caller can fall back to ROM content.
pub struct Ram {
    data: HashMap<WordType, u8>,
}

impl Ram {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    pub fn read_byte(&self, addr: WordType) -> Option<u8> {
        self.data.get(&addr).copied()
    }

    pub fn write_byte(&mut self, addr: WordType, value: u8) {
        self.data.insert(addr, value);
    }

    pub fn contains(&self, addr: WordType) -> bool {
        self.data.contains_key(&addr)
    }

    /// Number of bytes ever written.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
