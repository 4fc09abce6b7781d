use log::debug;

use crate::{config::arch_config::WordType, device::DeviceTrait};

mod offset {
    use crate::config::arch_config::WordType;

    pub const DATA: WordType = 0x00;
    pub const STATUS: WordType = 0x04;
}

/// Transmit-only UART. Every byte written to the data register is appended
/// to an in-memory buffer; both registers read back as 0 (transmitter ready).
pub struct Uart {
    output: String,
}

impl Uart {
    pub fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    pub fn output(&self) -> &str {
        &self.output
    }
}

impl DeviceTrait for Uart {
    fn read(&mut self, offset: WordType) -> Option<WordType> {
        match offset {
            offset::DATA | offset::STATUS => Some(0),
            _ => None,
        }
    }

    fn write(&mut self, offset: WordType, data: WordType) -> bool {
        match offset {
            offset::DATA => {
                let ch = char::from(data as u8);
                debug!("UART TX: {:?} ({:#04x})", ch, data as u8);
                self.output.push(ch);
                true
            }
            // Status is read-only; the store is swallowed.
            offset::STATUS => true,
            _ => false,
        }
    }

    fn step(&mut self) {}
}
