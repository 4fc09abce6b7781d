use num_enum::IntoPrimitive;

use crate::{
    config::arch_config::{WordType, XLEN},
    isa::riscv::csr_reg::InterruptBits,
};

pub mod trap_controller;

/// Trap Cause
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Trap {
    Interrupt(Interrupt),
    Exception(Exception),
}

/// Machine-mode interrupt lines.
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, IntoPrimitive)]
pub enum Interrupt {
    MachineSoft = 3,
    MachineTimer = 7,
    MachineExternal = 11,
}

/// Synchronous exceptions raised by the executing instruction.
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, IntoPrimitive)]
pub enum Exception {
    IllegalInstruction = 2,
    Breakpoint = 3,
    MachineEnvCall = 11,
}

impl Interrupt {
    /// Delivery order when several lines are eligible in the same cycle.
    pub const PRIORITY: [Interrupt; 3] = [
        Interrupt::MachineTimer,
        Interrupt::MachineSoft,
        Interrupt::MachineExternal,
    ];

    pub fn bit(self) -> InterruptBits {
        match self {
            Interrupt::MachineSoft => InterruptBits::MSI,
            Interrupt::MachineTimer => InterruptBits::MTI,
            Interrupt::MachineExternal => InterruptBits::MEI,
        }
    }
}

impl Trap {
    /// Value written to `mcause`; interrupts carry the top bit.
    pub fn cause(self) -> WordType {
        match self {
            Trap::Interrupt(nr) => WordType::from(nr) | (1 << (XLEN - 1)),
            Trap::Exception(nr) => nr.into(),
        }
    }
}
