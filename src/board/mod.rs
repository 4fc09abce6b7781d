use crate::isa::riscv::executor::{RV32CPU, StepRecord};

pub mod virt;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BoardStatus {
    Running,
    /// The cycle budget is used up.
    Halt,
}

pub trait Board {
    /// Advance the whole board by one cycle.
    fn step(&mut self) -> StepRecord;
    fn status(&self) -> BoardStatus;

    fn cpu(&self) -> &RV32CPU;
    fn cpu_mut(&mut self) -> &mut RV32CPU;
}
