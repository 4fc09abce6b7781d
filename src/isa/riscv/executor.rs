use log::{debug, trace, warn};

use crate::{
    config::{
        arch_config::{REGFILE_CNT, WordType},
        ram_config::FETCH_WARN_LIMIT,
        sim_config::SimConfig,
    },
    cpu::RegFile,
    device::{Mem, MemSize, mmio::MemoryMapIO},
    isa::riscv::{
        NOP,
        csr_reg::{CsrRegFile, InterruptBits},
        decoder::{DecodeInstr, Decoder},
        instruction::{RVInstrInfo, exec_mapping::get_exec_func, instr_table::RiscvInstr},
        trap::{Exception, Interrupt, Trap, trap_controller::TrapController},
    },
    rom::Rom,
};

/// What one call to [`RV32CPU::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRecord {
    /// Address the instruction was fetched from.
    pub pc: WordType,
    pub raw: u32,
    /// `None` for an illegal opcode.
    pub decoded: Option<DecodeInstr>,
    /// The exception this instruction raised, already delivered.
    pub exception: Option<Exception>,
}

impl StepRecord {
    pub fn retired(&self) -> bool {
        self.exception.is_none()
    }
}

pub struct RV32CPU {
    pub(super) reg_file: RegFile,
    pub(super) memory: MemoryMapIO,
    pub(super) pc: WordType,
    pub(super) decoder: Decoder,
    pub(super) csr: CsrRegFile,

    /// Interrupt lines currently raised. Kept apart from `mip`, which is
    /// ordinary storage for software.
    pub(super) pending: InterruptBits,
    /// Set on trap entry, cleared by `mret`.
    pub(super) in_exception: bool,
}

impl Default for RV32CPU {
    fn default() -> Self {
        Self::new(Rom::new(), &SimConfig::default())
    }
}

impl RV32CPU {
    pub fn new(rom: Rom, config: &SimConfig) -> Self {
        let mut reg_file = RegFile::new();
        reg_file.write(2, config.initial_sp);

        Self {
            reg_file,
            memory: MemoryMapIO::new(rom),
            pc: config.reset_pc,
            decoder: Decoder::new(),
            csr: CsrRegFile::new(),
            pending: InterruptBits::empty(),
            in_exception: false,
        }
    }

    pub(in super::super) fn execute(
        &mut self,
        instr: RiscvInstr,
        info: RVInstrInfo,
    ) -> Result<(), Exception> {
        let rst = get_exec_func(instr)(info, self);
        self.reg_file.clear_zero();

        rst
    }

    /// Undefined memory is fetched as a no-op.
    fn fetch(&mut self) -> u32 {
        if !self.memory.is_backed(self.pc, MemSize::Word) {
            if self.pc < FETCH_WARN_LIMIT {
                warn!("PC {:#010x} has no content, executing nop", self.pc);
            } else {
                debug!("PC {:#010x} has no content, executing nop", self.pc);
            }
            return NOP;
        }

        self.memory.read(self.pc, MemSize::Word)
    }

    /// Decode and execute `raw` as if it were fetched from the current pc.
    /// An exception is delivered to the trap handler before returning.
    pub(super) fn dispatch(&mut self, raw: u32) -> StepRecord {
        let pc = self.pc;

        // ID
        let decoded = self.decoder.decode(raw);

        // EX && MEM && WB
        let result = match decoded {
            Some(DecodeInstr(instr, info)) => {
                trace!("Decoded instruction: {:?}, info: {:?}", instr, info);
                self.execute(instr, info)
            }
            None => {
                warn!("Illegal instruction: {:#010x} at {:#010x}", raw, pc);
                Err(Exception::IllegalInstruction)
            }
        };

        let exception = result.err();
        if let Some(nr) = exception {
            let tval = match nr {
                Exception::IllegalInstruction => raw,
                _ => 0,
            };
            TrapController::send_trap_signal(self, Trap::Exception(nr), tval);
        }

        StepRecord {
            pc,
            raw,
            decoded,
            exception,
        }
    }

    /// Fetch and execute one instruction. Interrupts are not considered here.
    pub fn step(&mut self) -> StepRecord {
        // IF
        let raw = self.fetch();
        trace!("raw instruction: {:#010x} at {:#010x}", raw, self.pc);

        self.dispatch(raw)
    }

    /// Take the highest priority eligible interrupt, if any.
    pub fn take_interrupt(&mut self) -> Option<Interrupt> {
        let interrupt = TrapController::check_interrupt(self)?;
        TrapController::send_trap_signal(self, Trap::Interrupt(interrupt), 0);
        Some(interrupt)
    }

    /// Raise or lower interrupt lines.
    pub fn set_pending(&mut self, lines: InterruptBits, level: bool) {
        self.pending.set(lines, level);
    }

    /// Copy the timer comparator output onto the timer interrupt line.
    pub fn sync_timer_line(&mut self) {
        let level = self.memory.clint().is_pending();
        self.pending.set(InterruptBits::MTI, level);
    }

    pub fn pc(&self) -> WordType {
        self.pc
    }

    pub fn reg(&self, idx: u8) -> WordType {
        self.reg_file.read(idx, 0).0
    }

    pub fn regs(&self) -> &[WordType; REGFILE_CNT] {
        self.reg_file.as_slice()
    }

    pub fn csr(&self) -> &CsrRegFile {
        &self.csr
    }

    pub fn csr_mut(&mut self) -> &mut CsrRegFile {
        &mut self.csr
    }

    pub fn memory(&self) -> &MemoryMapIO {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut MemoryMapIO {
        &mut self.memory
    }

    pub fn pending(&self) -> InterruptBits {
        self.pending
    }

    pub fn in_exception(&self) -> bool {
        self.in_exception
    }
}
