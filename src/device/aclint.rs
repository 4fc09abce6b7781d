use log::debug;

use crate::{config::arch_config::WordType, device::DeviceTrait};

mod offset {
    use crate::config::arch_config::WordType;

    pub const MTIME: WordType = 0x00;
    pub const MTIMECMP: WordType = 0x08;
}

/// Machine timer: a free-running `mtime` counter and a 32-bit compare register.
pub struct Clint {
    mtime: u64,
    mtimecmp: WordType,
}

impl Clint {
    pub fn new() -> Self {
        Self {
            mtime: 0,
            // No interrupt until software programs the comparator.
            mtimecmp: WordType::MAX,
        }
    }

    pub fn mtime(&self) -> u64 {
        self.mtime
    }

    pub fn mtimecmp(&self) -> WordType {
        self.mtimecmp
    }

    pub fn set_mtimecmp(&mut self, value: WordType) {
        debug!("TIMER: mtimecmp = {:#010x}", value);
        self.mtimecmp = value;
    }

    /// Level of the machine timer interrupt line.
    pub fn is_pending(&self) -> bool {
        self.mtime >= self.mtimecmp as u64
    }
}

impl DeviceTrait for Clint {
    fn read(&mut self, offset: WordType) -> Option<WordType> {
        match offset {
            offset::MTIME => Some(self.mtime as WordType),
            offset::MTIMECMP => Some(self.mtimecmp),
            _ => None,
        }
    }

    fn write(&mut self, offset: WordType, data: WordType) -> bool {
        match offset {
            offset::MTIMECMP => {
                self.set_mtimecmp(data);
                true
            }
            // `mtime` is only advanced by the clock.
            _ => false,
        }
    }

    fn step(&mut self) {
        self.mtime = self.mtime.wrapping_add(1);
    }
}
