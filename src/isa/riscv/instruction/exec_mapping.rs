use crate::isa::riscv::instruction::{ExecFn, exec_function::*, instr_table::RiscvInstr};

pub(in crate::isa::riscv) fn get_exec_func(instr: RiscvInstr) -> ExecFn {
    match instr {
        //---------------------------------------
        // RV_I
        //---------------------------------------

        // Arith
        RiscvInstr::ADD | RiscvInstr::ADDI => exec_arith::<ExecAdd>,
        RiscvInstr::SUB => exec_arith::<ExecSub>,

        // Shift
        RiscvInstr::SLL | RiscvInstr::SLLI => exec_arith::<ExecSLL>,
        RiscvInstr::SRL | RiscvInstr::SRLI => exec_arith::<ExecSRL>,
        RiscvInstr::SRA | RiscvInstr::SRAI => exec_arith::<ExecSRA>,

        // Cond set
        RiscvInstr::SLT | RiscvInstr::SLTI => exec_arith::<ExecSignedLess>,
        RiscvInstr::SLTU | RiscvInstr::SLTIU => exec_arith::<ExecUnsignedLess>,

        // Bit
        RiscvInstr::AND | RiscvInstr::ANDI => exec_arith::<ExecAnd>,
        RiscvInstr::OR | RiscvInstr::ORI => exec_arith::<ExecOr>,
        RiscvInstr::XOR | RiscvInstr::XORI => exec_arith::<ExecXor>,

        // Branch
        RiscvInstr::BEQ => exec_branch::<ExecEqual>,
        RiscvInstr::BNE => exec_branch::<ExecNotEqual>,
        RiscvInstr::BLT => exec_branch::<ExecSignedLess>,
        RiscvInstr::BGE => exec_branch::<ExecSignedGreatEqual>,
        RiscvInstr::BLTU => exec_branch::<ExecUnsignedLess>,
        RiscvInstr::BGEU => exec_branch::<ExecUnsignedGreatEqual>,

        // Load
        RiscvInstr::LB => exec_load::<1, true>,
        RiscvInstr::LBU => exec_load::<1, false>,
        RiscvInstr::LH => exec_load::<2, true>,
        RiscvInstr::LHU => exec_load::<2, false>,
        RiscvInstr::LW => exec_load::<4, false>,

        // Store
        RiscvInstr::SB => exec_store::<1>,
        RiscvInstr::SH => exec_store::<2>,
        RiscvInstr::SW => exec_store::<4>,

        // Jump and upper immediate
        RiscvInstr::JAL => exec_jal,
        RiscvInstr::JALR => exec_jalr,
        RiscvInstr::LUI => exec_lui,
        RiscvInstr::AUIPC => exec_auipc,

        // We are executing in order, so don't need to do anything.
        RiscvInstr::FENCE => exec_nop,

        //---------------------------------------
        // RV_M
        //---------------------------------------
        RiscvInstr::MUL => exec_arith::<ExecMulLow>,
        RiscvInstr::MULH => exec_arith::<ExecMulHighSigned>,
        RiscvInstr::MULHU => exec_arith::<ExecMulHighUnsigned>,
        RiscvInstr::MULHSU => exec_arith::<ExecMulHighSignedUnsigned>,
        // DIV and REM divide the raw register values, so they share the
        // unsigned implementations.
        RiscvInstr::DIV | RiscvInstr::DIVU => exec_arith::<ExecDivUnsigned>,
        RiscvInstr::REM | RiscvInstr::REMU => exec_arith::<ExecRemUnsigned>,

        //---------------------------------------
        // System
        //---------------------------------------
        RiscvInstr::ECALL => exec_ecall,
        RiscvInstr::EBREAK => exec_ebreak,
        RiscvInstr::MRET => exec_mret,

        RiscvInstr::CSRRW => exec_csrw::<false>,
        RiscvInstr::CSRRC => exec_csr_bit::<false, false>,
        RiscvInstr::CSRRS => exec_csr_bit::<true, false>,
        RiscvInstr::CSRRWI => exec_csrw::<true>,
        RiscvInstr::CSRRCI => exec_csr_bit::<false, true>,
        RiscvInstr::CSRRSI => exec_csr_bit::<true, true>,

        RiscvInstr::RESERVED => exec_reserved,
    }
}
