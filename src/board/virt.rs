use log::{debug, info, warn};

use crate::{
    board::{Board, BoardStatus},
    config::{
        arch_config::{REGFILE_CNT, WordType},
        sim_config::{PROGRESS_INTERVAL, SimConfig},
    },
    device::{Mem, MemSize},
    isa::riscv::{
        executor::{RV32CPU, StepRecord},
        trap::Interrupt,
    },
    rom::Rom,
};

/// The simulated machine: one hart, sparse RAM over a ROM image, a UART
/// and a machine timer.
pub struct VirtBoard {
    cpu: RV32CPU,
    config: SimConfig,

    cycles: u64,
    instret: u64,

    status: BoardStatus,
}

impl VirtBoard {
    pub fn new(rom: Rom, config: SimConfig) -> Self {
        info!(
            "board: {} ROM words, sp = {:#010x}, pc = {:#010x}, max cycles = {}",
            rom.len(),
            config.initial_sp,
            config.reset_pc,
            config.max_cycles
        );

        let status = if config.max_cycles == 0 {
            BoardStatus::Halt
        } else {
            BoardStatus::Running
        };

        Self {
            cpu: RV32CPU::new(rom, &config),
            config,
            cycles: 0,
            instret: 0,
            status,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Run until the cycle budget is used up. Returns the number of cycles
    /// executed by this call.
    pub fn run(&mut self) -> u64 {
        self.run_until(|_| false)
    }

    /// Like [`VirtBoard::run`], but `stop` is asked before every cycle and
    /// ends the run early when it returns `true`.
    pub fn run_until<F>(&mut self, mut stop: F) -> u64
    where
        F: FnMut(&VirtBoard) -> bool,
    {
        let start = self.cycles;
        while self.status == BoardStatus::Running && !stop(self) {
            self.step();
        }

        info!(
            "stopped after {} cycles ({} instructions), pc = {:#010x}",
            self.cycles,
            self.instret,
            self.cpu.pc()
        );
        self.cycles - start
    }

    /// Drive the software or external interrupt line. The timer line follows
    /// the timer device and cannot be forced.
    pub fn set_interrupt_pending(&mut self, interrupt: Interrupt, level: bool) {
        if interrupt == Interrupt::MachineTimer {
            warn!("the timer interrupt line is driven by the timer device");
            return;
        }

        debug!("host sets {:?} line to {}", interrupt, level);
        self.cpu.set_pending(interrupt.bit(), level);
    }

    /// Host-side CSR write, with the same masking as a CSR instruction.
    pub fn write_csr(&mut self, addr: u16, value: WordType) -> bool {
        self.cpu.csr_mut().write(addr, value)
    }

    /// Host-side store through the memory map.
    pub fn write_mem(&mut self, addr: WordType, data: WordType, size: MemSize) {
        self.cpu.memory_mut().write(addr, data, size);
    }

    pub fn read_mem(&mut self, addr: WordType, size: MemSize) -> WordType {
        self.cpu.memory_mut().read(addr, size)
    }

    pub fn pc(&self) -> WordType {
        self.cpu.pc()
    }

    pub fn reg(&self, idx: u8) -> WordType {
        self.cpu.reg(idx)
    }

    pub fn regs(&self) -> &[WordType; REGFILE_CNT] {
        self.cpu.regs()
    }

    /// `None` for an address with no CSR behind it.
    pub fn csr(&self, addr: u16) -> Option<WordType> {
        self.cpu.csr().read(addr)
    }

    pub fn uart_output(&self) -> &str {
        self.cpu.memory().uart().output()
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn instret(&self) -> u64 {
        self.instret
    }

    pub fn mtime(&self) -> u64 {
        self.cpu.memory().clint().mtime()
    }

    pub fn mtimecmp(&self) -> WordType {
        self.cpu.memory().clint().mtimecmp()
    }

    pub fn in_trap(&self) -> bool {
        self.cpu.in_exception()
    }

    pub fn interrupts_enabled(&self) -> bool {
        self.cpu.csr().interrupts_enabled()
    }

    fn trace(&self, record: &StepRecord) {
        match record.decoded {
            Some(decoded) => debug!(
                "[{:>8}] pc = {:#010x}, raw = {:#010x}, {}",
                self.cycles, record.pc, record.raw, decoded
            ),
            None => debug!(
                "[{:>8}] pc = {:#010x}, raw = {:#010x}, illegal",
                self.cycles, record.pc, record.raw
            ),
        }
    }
}

impl Board for VirtBoard {
    fn step(&mut self) -> StepRecord {
        // The timer ticks before the fetch, so `mtime` equals the number of
        // the cycle being executed.
        self.cpu.memory_mut().step_devices();

        let record = self.cpu.step();
        if self.config.trace {
            self.trace(&record);
        }

        self.cpu.sync_timer_line();

        // Every dispatched instruction counts, trapping or not.
        self.instret += 1;

        // An exception in this cycle wins over interrupt delivery.
        if record.retired() {
            if let Some(interrupt) = self.cpu.take_interrupt() {
                debug!("{:?} taken at cycle {}", interrupt, self.cycles + 1);
            }
        }

        self.cycles += 1;
        if self.cycles % PROGRESS_INTERVAL == 0 {
            info!("cycle {}, pc = {:#010x}", self.cycles, self.cpu.pc());
        }
        if self.cycles >= self.config.max_cycles {
            self.status = BoardStatus::Halt;
        }

        record
    }

    fn status(&self) -> BoardStatus {
        self.status
    }

    fn cpu(&self) -> &RV32CPU {
        &self.cpu
    }

    fn cpu_mut(&mut self) -> &mut RV32CPU {
        &mut self.cpu
    }
}
