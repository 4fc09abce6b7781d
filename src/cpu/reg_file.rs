use std::{
    fmt::Debug,
    ops::{Index, IndexMut},
};

use crate::config::arch_config::{REG_NAME, REGFILE_CNT, WordType};

pub struct RegFile {
    data: [WordType; REGFILE_CNT],
}

impl Index<usize> for RegFile {
    type Output = WordType;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl IndexMut<usize> for RegFile {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl Debug for RegFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "reg_file {{")?;
        for (i, val) in self.data.iter().enumerate() {
            if i % 4 == 0 {
                write!(f, "  ")?;
            }

            write!(f, "x{:02} ({:>5}): {:#010x}  ", i, REG_NAME[i], val)?;

            if i % 4 == 3 {
                writeln!(f)?;
            }
        }

        write!(f, "}}")
    }
}

impl RegFile {
    pub fn new() -> Self {
        Self {
            data: [0; REGFILE_CNT],
        }
    }

    pub fn read(&self, id1: u8, id2: u8) -> (WordType, WordType) {
        (self.data[id1 as usize], self.data[id2 as usize])
    }

    /// Writing `x0` is allowed here; [`RegFile::clear_zero`] hides it again
    /// once the instruction completes.
    pub fn write(&mut self, id: u8, data: WordType) {
        self.data[id as usize] = data
    }

    pub fn clear_zero(&mut self) {
        self.data[0] = 0;
    }

    pub fn as_slice(&self) -> &[WordType; REGFILE_CNT] {
        &self.data
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_register_is_hidden_after_clear() {
        let mut regs = RegFile::new();
        regs.write(0, 0xdead_beef);
        regs.write(5, 42);
        assert_eq!(regs[0], 0xdead_beef);

        regs.clear_zero();
        assert_eq!(regs.read(0, 5), (0, 42));
    }

    #[test]
    fn debug_dump_names_registers() {
        let mut regs = RegFile::new();
        regs.write(2, 0x8000);
        let dump = format!("{:?}", regs);
        assert!(dump.contains("x02 (   sp): 0x00008000"));
        assert!(dump.contains("t6"));
    }
}
