use std::fmt::{self, Display};

use rv32_ils::{
    board::virt::VirtBoard,
    config::arch_config::{REG_NAME, WordType},
    isa::riscv::csr_reg::CsrAddr,
};

/// Final machine state in a human readable form.
pub struct Report<'a>(pub &'a VirtBoard);

impl Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board = self.0;

        writeln!(f, "===== registers =====")?;
        for (row, chunk) in board.regs().chunks(4).enumerate() {
            for (col, value) in chunk.iter().enumerate() {
                let idx = row * 4 + col;
                write!(f, "x{:<2} {:>5} = {:#010x}  ", idx, REG_NAME[idx], value)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "pc        = {:#010x}", board.pc())?;

        writeln!(f, "===== csr =====")?;
        for csr in CsrAddr::ALL {
            let value: WordType = board.csr(csr.into()).unwrap_or(0);
            writeln!(f, "{:<9} = {:#010x}", csr.name(), value)?;
        }

        writeln!(f, "===== uart =====")?;
        writeln!(f, "{}", board.uart_output())?;

        writeln!(f, "===== counters =====")?;
        writeln!(f, "cycles  = {}", board.cycles())?;
        writeln!(f, "instret = {}", board.instret())
    }
}
