mod cpu_tester;
pub mod csr_reg;
pub mod decoder;
pub mod executor;
pub mod instruction;
pub mod trap;

/// `addi x0, x0, 0`
pub const NOP: u32 = 0x0000_0013;
pub const ECALL: u32 = 0x0000_0073;
pub const EBREAK: u32 = 0x0010_0073;
pub const MRET: u32 = 0x3020_0073;
