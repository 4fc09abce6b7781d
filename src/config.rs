pub mod arch_config {
    pub type WordType = u32;
    pub type SignedWordType = i32;
    pub type DoubleWordType = u64;
    pub type SignedDoubleWordType = i64;

    pub const XLEN: usize = 32;
    pub const REGFILE_CNT: usize = 32;

    #[rustfmt::skip]
    pub const REG_NAME: [&str; REGFILE_CNT] = [
        "zero", "ra",   "sp",   "gp",   "tp",   "t0",   "t1",   "t2",
        "s0/fp", "s1",  "a0",   "a1",   "a2",   "a3",   "a4",   "a5",
        "a6",   "a7",   "s2",   "s3",   "s4",   "s5",   "s6",   "s7",
        "s8",   "s9",   "s10",  "s11",  "t3",   "t4",   "t5",   "t6",
    ];

    /// `misa` for RV32IM: MXL = 1, extensions `I` and `M`.
    pub const MISA_VALUE: WordType = 0x4000_1100;
}

pub mod ram_config {
    use crate::config::arch_config::WordType;

    pub const DEFAULT_PC_VALUE: WordType = 0x0;
    pub const DEFAULT_SP_VALUE: WordType = 0x0000_8000;

    /// Fetching undefined content below this address is reported as a warning;
    /// above it the fetch is assumed to be a deliberate jump into RAM.
    pub const FETCH_WARN_LIMIT: WordType = 0x1_0000;
}

pub mod sim_config {
    use crate::config::{arch_config::WordType, ram_config};

    pub const DEFAULT_MAX_CYCLES: u64 = 150_000;

    /// A progress line is logged every this many cycles.
    pub const PROGRESS_INTERVAL: u64 = 100_000;

    /// Inputs normally supplied by the command line.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SimConfig {
        pub initial_sp: WordType,
        pub max_cycles: u64,
        pub trace: bool,
        pub reset_pc: WordType,
    }

    impl Default for SimConfig {
        fn default() -> Self {
            Self {
                initial_sp: ram_config::DEFAULT_SP_VALUE,
                max_cycles: DEFAULT_MAX_CYCLES,
                trace: false,
                reset_pc: ram_config::DEFAULT_PC_VALUE,
            }
        }
    }

    impl SimConfig {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn initial_sp(mut self, sp: WordType) -> Self {
            self.initial_sp = sp;
            self
        }

        pub fn max_cycles(mut self, max_cycles: u64) -> Self {
            self.max_cycles = max_cycles;
            self
        }

        pub fn trace(mut self, trace: bool) -> Self {
            self.trace = trace;
            self
        }

        pub fn reset_pc(mut self, pc: WordType) -> Self {
            self.reset_pc = pc;
            self
        }
    }
}
