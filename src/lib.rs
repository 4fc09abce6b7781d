pub mod board;
pub mod config;
pub mod cpu;
pub mod device;
pub mod isa;
pub mod load;
pub mod ram;
pub mod rom;

mod utils;

pub use config::sim_config::SimConfig;

use std::path::Path;

use crate::{
    board::{Board, BoardStatus, virt::VirtBoard},
    isa::riscv::executor::StepRecord,
    load::{LoadError, load_hex},
    rom::Rom,
};

pub struct Emulator {
    board: VirtBoard,
}

impl Emulator {
    pub fn from_rom(rom: Rom, config: SimConfig) -> Self {
        Self {
            board: VirtBoard::new(rom, config),
        }
    }

    pub fn from_hex_file(path: &Path, config: SimConfig) -> Result<Self, LoadError> {
        Ok(Self::from_rom(load_hex(path)?, config))
    }

    /// Run until the cycle budget is used up. Returns the cycles executed.
    pub fn run(&mut self) -> u64 {
        self.board.run()
    }

    /// Run until the cycle budget is used up or `stop` returns `true`.
    pub fn run_until<F>(&mut self, stop: F) -> u64
    where
        F: FnMut(&VirtBoard) -> bool,
    {
        self.board.run_until(stop)
    }

    /// One cycle, or `None` once the board has halted.
    pub fn step(&mut self) -> Option<StepRecord> {
        if self.board.status() == BoardStatus::Halt {
            return None;
        }
        Some(self.board.step())
    }

    pub fn board(&self) -> &VirtBoard {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut VirtBoard {
        &mut self.board
    }
}
