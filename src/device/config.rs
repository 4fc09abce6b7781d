use crate::config::arch_config::WordType;

pub const UART_BASE: WordType = 0x1000_0000;
pub const UART_SIZE: WordType = 8;
pub const UART_DATA: WordType = UART_BASE;
pub const UART_STATUS: WordType = UART_BASE + 4;

pub const CLINT_BASE: WordType = 0x2000_0000;
pub const CLINT_SIZE: WordType = 0x10;
pub const CLINT_MTIME: WordType = CLINT_BASE;
pub const CLINT_MTIMECMP: WordType = CLINT_BASE + 8;
