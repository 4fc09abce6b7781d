use crate::config::arch_config::WordType;

pub mod aclint;
pub mod config;
pub mod mmio;
pub mod uart;

/// Width of a single memory access.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemSize {
    Byte = 1,
    Half = 2,
    Word = 4,
}

impl MemSize {
    #[inline]
    pub fn bytes(self) -> u32 {
        self as u32
    }

    #[inline]
    pub fn bits(self) -> u32 {
        self.bytes() * 8
    }
}

/// Byte-addressable storage. Accesses never fault: any address is readable
/// and writable.
pub trait Mem {
    /// Read `size` bytes at `addr`, zero-extended to a word.
    fn read(&mut self, addr: WordType, size: MemSize) -> WordType;

    /// Store the low `size` bytes of `data` at `addr`.
    fn write(&mut self, addr: WordType, data: WordType, size: MemSize);
}

/// A memory mapped device. Offsets are relative to the device base.
///
/// Only the exact register offsets are claimed by a device; any other offset
/// inside its window is ordinary memory.
pub trait DeviceTrait {
    fn read(&mut self, offset: WordType) -> Option<WordType>;

    /// Returns `false` if no register lives at `offset`.
    fn write(&mut self, offset: WordType, data: WordType) -> bool;

    /// Advance the device by one cycle.
    fn step(&mut self);
}
