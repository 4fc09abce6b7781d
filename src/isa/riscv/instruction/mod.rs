pub(super) mod exec_function;
pub mod exec_mapping;
pub mod instr_table;

use crate::isa::riscv::{executor::RV32CPU, trap::Exception};

/// A helper function for normal instruction execution.
///
/// It takes a closure `f` that performs the actual instruction logic.
/// If `f` executes successfully, it will increase PC by 4.
#[inline(always)]
pub(super) fn normal_exec<F>(cpu: &mut RV32CPU, f: F) -> Result<(), Exception>
where
    F: FnOnce(&mut RV32CPU) -> Result<(), Exception>,
{
    f(cpu)?;
    cpu.pc = cpu.pc.wrapping_add(4);
    Ok(())
}

pub(crate) type ExecFn = fn(RVInstrInfo, &mut RV32CPU) -> Result<(), Exception>;

/// Operands of a decoded instruction. Immediates are kept raw (not sign
/// extended) except where noted:
///
/// Type I: 12 bit (5 bit shift amount for shifts, CSR address for Zicsr)
/// Type S: 12 bit
/// Type B: 13 bit, bit 0 always clear
/// Type U: already shifted left by 12
/// Type J: 21 bit, bit 0 always clear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RVInstrInfo {
    None,
    R { rs1: u8, rs2: u8, rd: u8 },
    I { rs1: u8, rd: u8, imm: u32 },
    S { rs1: u8, rs2: u8, imm: u32 },
    B { rs1: u8, rs2: u8, imm: u32 },
    U { rd: u8, imm: u32 },
    J { rd: u8, imm: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrFormat {
    /// Matched against the whole instruction word.
    None,
    R,
    I,
    S,
    B,
    U,
    J,
}

/// One row of an instruction table.
///
/// An instruction matches when `raw & mask == key`. The mask covers the opcode,
/// then `funct3`, then `funct7`, depending on how many fields the row lists.
/// A row written `[..] / bits` compares only those `funct7` bits.
#[derive(Debug, Clone, Copy)]
pub struct RV32Desc {
    pub instr: RiscvInstr,
    pub format: InstrFormat,
    pub opcode: u8,
    pub mask: u32,
    pub key: u32,
}

const MASK_OPCODE: u32 = 0x0000_007F;
const MASK_FUNCT3: u32 = 0x0000_7000;
const MASK_FUNCT7: u32 = 0xFE00_0000;

impl RV32Desc {
    pub const fn new(instr: RiscvInstr, format: InstrFormat, fields: &[u32]) -> Self {
        if let InstrFormat::None = format {
            return Self {
                instr,
                format,
                opcode: (fields[0] & MASK_OPCODE) as u8,
                mask: !0,
                key: fields[0],
            };
        }

        let mut mask = MASK_OPCODE;
        let mut key = fields[0];
        if fields.len() > 1 {
            mask |= MASK_FUNCT3;
            key |= fields[1] << 12;
        }
        if fields.len() > 2 {
            mask |= MASK_FUNCT7;
            key |= fields[2] << 25;
        }

        Self {
            instr,
            format,
            opcode: fields[0] as u8,
            mask,
            key,
        }
    }

    /// Compare only the `funct7` bits set in `funct7_mask`.
    pub const fn with_funct7_mask(self, funct7_mask: u32) -> Self {
        let mask = (self.mask & !MASK_FUNCT7) | ((funct7_mask << 25) & MASK_FUNCT7);
        Self {
            mask,
            key: self.key & mask,
            ..self
        }
    }

    #[inline]
    pub fn matches(&self, raw: u32) -> bool {
        raw & self.mask == self.key
    }
}

// define a single enum for every instruction
// define tables for each instruction set
#[macro_export]
macro_rules! define_riscv_isa {
    ( $tot_instr_name:ident,
        $( $isa_name:ident, $isa_table_name:ident, {
            $( $name:ident => $fmt:ident [ $( $field:expr ),+ ] $( / $funct7_mask:expr )? ),* $(,)?
        } ),* $(,)?
    ) => {
        #[allow(clippy::upper_case_acronyms)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $tot_instr_name {
            $( $( $name, )* )*
            /// An unassigned encoding inside a known opcode class.
            RESERVED,
        }

        impl $tot_instr_name {
            pub fn isa_name(&self) -> &'static str {
                match self {
                    $( $( $tot_instr_name::$name => stringify!($isa_name), )* )*
                    $tot_instr_name::RESERVED => "RESERVED",
                }
            }
        }

        $(
            pub const $isa_table_name: &[$crate::isa::riscv::instruction::RV32Desc] = &[
                $(
                    $crate::isa::riscv::instruction::RV32Desc::new(
                        $tot_instr_name::$name,
                        $crate::isa::riscv::instruction::InstrFormat::$fmt,
                        &[ $( $field ),+ ],
                    )
                    $( .with_funct7_mask($funct7_mask) )?
                ),*
            ];
        )*
    };
}

pub use instr_table::RiscvInstr;
