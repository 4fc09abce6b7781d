use log::warn;

use crate::{
    config::arch_config::{DoubleWordType, SignedDoubleWordType, WordType},
    device::{Mem, MemSize},
    isa::riscv::{
        executor::RV32CPU,
        instruction::{RVInstrInfo, normal_exec},
        trap::{Exception, trap_controller::TrapController},
    },
    utils::{sign_extend, wrapping_add_as_signed},
};

/// ExecTrait will generate operation result to `exec_xxx` function.
/// ExecTrait::exec only do calculate.
/// `exec_xxx` function interact with other mod in CPU.
pub(super) trait ExecTrait<T> {
    fn exec(a: WordType, b: WordType) -> T;
}

const fn access_size(bytes: u32) -> MemSize {
    match bytes {
        1 => MemSize::Byte,
        2 => MemSize::Half,
        _ => MemSize::Word,
    }
}

/// Process arithmetic instructions with `rs1`, (`rs2` or `imm`) and `rd`.
///
/// `imm` is always sign extended from 12 bit; shift amounts are already
/// narrowed to 5 bit by the decoder.
pub(super) fn exec_arith<F>(info: RVInstrInfo, cpu: &mut RV32CPU) -> Result<(), Exception>
where
    F: ExecTrait<WordType>,
{
    let (rd, rst) = match info {
        RVInstrInfo::R { rs1, rs2, rd } => {
            let (val1, val2) = cpu.reg_file.read(rs1, rs2);
            (rd, F::exec(val1, val2))
        }
        RVInstrInfo::I { rs1, rd, imm } => {
            let val1 = cpu.reg_file.read(rs1, 0).0;
            (rd, F::exec(val1, sign_extend(imm, 12)))
        }
        _ => std::unreachable!(),
    };

    cpu.reg_file.write(rd, rst);
    cpu.pc = cpu.pc.wrapping_add(4);

    Ok(())
}

pub(super) fn exec_branch<F>(info: RVInstrInfo, cpu: &mut RV32CPU) -> Result<(), Exception>
where
    F: ExecTrait<bool>,
{
    if let RVInstrInfo::B { rs1, rs2, imm } = info {
        let (val1, val2) = cpu.reg_file.read(rs1, rs2);

        if F::exec(val1, val2) {
            cpu.pc = cpu.pc.wrapping_add(sign_extend(imm, 13));
        } else {
            cpu.pc = cpu.pc.wrapping_add(4);
        }
    } else {
        std::unreachable!();
    }

    Ok(())
}

pub(super) fn exec_load<const BYTES: u32, const EXTEND: bool>(
    info: RVInstrInfo,
    cpu: &mut RV32CPU,
) -> Result<(), Exception> {
    if let RVInstrInfo::I { rs1, rd, imm } = info {
        let base = cpu.reg_file.read(rs1, 0).0;
        let addr = wrapping_add_as_signed(base, sign_extend(imm, 12));
        let size = access_size(BYTES);

        let mut data = cpu.memory.read(addr, size);
        if EXTEND {
            data = sign_extend(data, size.bits());
        }
        cpu.reg_file.write(rd, data);
    } else {
        std::unreachable!();
    }

    cpu.pc = cpu.pc.wrapping_add(4);
    Ok(())
}

pub(super) fn exec_store<const BYTES: u32>(
    info: RVInstrInfo,
    cpu: &mut RV32CPU,
) -> Result<(), Exception> {
    if let RVInstrInfo::S { rs1, rs2, imm } = info {
        let (base, data) = cpu.reg_file.read(rs1, rs2);
        let addr = wrapping_add_as_signed(base, sign_extend(imm, 12));

        cpu.memory.write(addr, data, access_size(BYTES));
    } else {
        std::unreachable!();
    }

    cpu.pc = cpu.pc.wrapping_add(4);
    Ok(())
}

pub(super) fn exec_lui(info: RVInstrInfo, cpu: &mut RV32CPU) -> Result<(), Exception> {
    if let RVInstrInfo::U { rd, imm } = info {
        normal_exec(cpu, |cpu| {
            cpu.reg_file.write(rd, imm);
            Ok(())
        })
    } else {
        std::unreachable!();
    }
}

pub(super) fn exec_auipc(info: RVInstrInfo, cpu: &mut RV32CPU) -> Result<(), Exception> {
    if let RVInstrInfo::U { rd, imm } = info {
        normal_exec(cpu, |cpu| {
            cpu.reg_file.write(rd, cpu.pc.wrapping_add(imm));
            Ok(())
        })
    } else {
        std::unreachable!();
    }
}

pub(super) fn exec_jal(info: RVInstrInfo, cpu: &mut RV32CPU) -> Result<(), Exception> {
    if let RVInstrInfo::J { rd, imm } = info {
        let target = cpu.pc.wrapping_add(sign_extend(imm, 21));
        cpu.reg_file.write(rd, cpu.pc.wrapping_add(4));
        cpu.pc = target;
    } else {
        std::unreachable!();
    }

    Ok(())
}

pub(super) fn exec_jalr(info: RVInstrInfo, cpu: &mut RV32CPU) -> Result<(), Exception> {
    if let RVInstrInfo::I { rs1, rd, imm } = info {
        let link = cpu.pc.wrapping_add(4);
        let base = cpu.reg_file.read(rs1, 0).0;

        // Read `rs1` before writing `rd`; they may be the same register.
        cpu.pc = base.wrapping_add(sign_extend(imm, 12)) & !1;
        cpu.reg_file.write(rd, link);
    } else {
        std::unreachable!();
    }

    Ok(())
}

/// CSRRW / CSRRWI. The old value goes to `rd` even when `rd` is `x0`.
pub(super) fn exec_csrw<const UIMM: bool>(
    info: RVInstrInfo,
    cpu: &mut RV32CPU,
) -> Result<(), Exception> {
    if let RVInstrInfo::I { rs1, rd, imm } = info {
        let new_val = if UIMM {
            rs1 as WordType
        } else {
            cpu.reg_file.read(rs1, 0).0
        };

        let addr = imm as u16;
        let old_val = cpu.csr.read(addr).unwrap_or(0);

        cpu.csr.write(addr, new_val);
        cpu.reg_file.write(rd, old_val);
    } else {
        std::unreachable!();
    }

    cpu.pc = cpu.pc.wrapping_add(4);

    Ok(())
}

/// CSRRS / CSRRC and their immediate forms.
pub(super) fn exec_csr_bit<const SET: bool, const UIMM: bool>(
    info: RVInstrInfo,
    cpu: &mut RV32CPU,
) -> Result<(), Exception> {
    if let RVInstrInfo::I { rs1, rd, imm } = info {
        let rhs = if UIMM {
            rs1 as WordType
        } else {
            cpu.reg_file.read(rs1, 0).0
        };

        let addr = imm as u16;
        let old_val = cpu.csr.read(addr).unwrap_or(0);

        let data = if SET { old_val | rhs } else { old_val & !rhs };
        cpu.csr.write(addr, data);
        cpu.reg_file.write(rd, old_val);
    } else {
        std::unreachable!();
    }

    cpu.pc = cpu.pc.wrapping_add(4);

    Ok(())
}

pub(super) fn exec_ecall(_info: RVInstrInfo, _cpu: &mut RV32CPU) -> Result<(), Exception> {
    Err(Exception::MachineEnvCall)
}

pub(super) fn exec_ebreak(_info: RVInstrInfo, _cpu: &mut RV32CPU) -> Result<(), Exception> {
    Err(Exception::Breakpoint)
}

pub(super) fn exec_mret(_info: RVInstrInfo, cpu: &mut RV32CPU) -> Result<(), Exception> {
    TrapController::mret(cpu);
    Ok(())
}

pub(super) fn exec_nop(_info: RVInstrInfo, cpu: &mut RV32CPU) -> Result<(), Exception> {
    cpu.pc = cpu.pc.wrapping_add(4);
    Ok(())
}

pub(super) fn exec_reserved(info: RVInstrInfo, cpu: &mut RV32CPU) -> Result<(), Exception> {
    warn!("reserved encoding at pc {:#010x} executed as nop", cpu.pc);
    exec_nop(info, cpu)
}

// =============================================
//                  ExecTrait
// =============================================
// Arith
pub(super) struct ExecAdd {}
impl ExecTrait<WordType> for ExecAdd {
    fn exec(a: WordType, b: WordType) -> WordType {
        a.wrapping_add(b)
    }
}

pub(super) struct ExecSub {}
impl ExecTrait<WordType> for ExecSub {
    fn exec(a: WordType, b: WordType) -> WordType {
        a.wrapping_sub(b)
    }
}

pub(super) struct ExecMulLow {}
impl ExecTrait<WordType> for ExecMulLow {
    fn exec(a: WordType, b: WordType) -> WordType {
        a.wrapping_mul(b)
    }
}

pub(super) struct ExecMulHighUnsigned {}
impl ExecTrait<WordType> for ExecMulHighUnsigned {
    fn exec(a: WordType, b: WordType) -> WordType {
        let a = a as DoubleWordType;
        let b = b as DoubleWordType;

        (a.wrapping_mul(b) >> 32) as WordType
    }
}

pub(super) struct ExecMulHighSigned {}
impl ExecTrait<WordType> for ExecMulHighSigned {
    fn exec(a: WordType, b: WordType) -> WordType {
        let a = a.cast_signed() as SignedDoubleWordType;
        let b = b.cast_signed() as SignedDoubleWordType;

        (a.wrapping_mul(b) >> 32) as WordType
    }
}

pub(super) struct ExecMulHighSignedUnsigned {}
impl ExecTrait<WordType> for ExecMulHighSignedUnsigned {
    fn exec(a: WordType, b: WordType) -> WordType {
        let a = a.cast_signed() as SignedDoubleWordType;
        let b = b as SignedDoubleWordType;

        (a.wrapping_mul(b) >> 32) as WordType
    }
}

pub(super) struct ExecDivUnsigned {}
impl ExecTrait<WordType> for ExecDivUnsigned {
    fn exec(a: WordType, b: WordType) -> WordType {
        if b == 0 {
            return WordType::MAX;
        }
        a.wrapping_div(b)
    }
}

pub(super) struct ExecRemUnsigned {}
impl ExecTrait<WordType> for ExecRemUnsigned {
    fn exec(a: WordType, b: WordType) -> WordType {
        if b == 0 {
            return a;
        }
        a.wrapping_rem(b)
    }
}

// Shift
pub(super) struct ExecSLL {}
impl ExecTrait<WordType> for ExecSLL {
    fn exec(a: WordType, b: WordType) -> WordType {
        a.wrapping_shl(b & 0x1F)
    }
}

pub(super) struct ExecSRL {}
impl ExecTrait<WordType> for ExecSRL {
    fn exec(a: WordType, b: WordType) -> WordType {
        a.wrapping_shr(b & 0x1F)
    }
}

pub(super) struct ExecSRA {}
impl ExecTrait<WordType> for ExecSRA {
    fn exec(a: WordType, b: WordType) -> WordType {
        a.cast_signed().wrapping_shr(b & 0x1F).cast_unsigned()
    }
}

// Bit
pub(super) struct ExecAnd {}
impl ExecTrait<WordType> for ExecAnd {
    fn exec(a: WordType, b: WordType) -> WordType {
        a & b
    }
}

pub(super) struct ExecOr {}
impl ExecTrait<WordType> for ExecOr {
    fn exec(a: WordType, b: WordType) -> WordType {
        a | b
    }
}

pub(super) struct ExecXor {}
impl ExecTrait<WordType> for ExecXor {
    fn exec(a: WordType, b: WordType) -> WordType {
        a ^ b
    }
}

// Compare
pub(super) struct ExecSignedLess {}
impl ExecTrait<bool> for ExecSignedLess {
    fn exec(a: WordType, b: WordType) -> bool {
        a.cast_signed() < b.cast_signed()
    }
}
impl ExecTrait<WordType> for ExecSignedLess {
    fn exec(a: WordType, b: WordType) -> WordType {
        (a.cast_signed() < b.cast_signed()) as WordType
    }
}

pub(super) struct ExecUnsignedLess {}
impl ExecTrait<bool> for ExecUnsignedLess {
    fn exec(a: WordType, b: WordType) -> bool {
        a < b
    }
}
impl ExecTrait<WordType> for ExecUnsignedLess {
    fn exec(a: WordType, b: WordType) -> WordType {
        (a < b) as WordType
    }
}

pub(super) struct ExecEqual {}
impl ExecTrait<bool> for ExecEqual {
    fn exec(a: WordType, b: WordType) -> bool {
        a == b
    }
}

pub(super) struct ExecNotEqual {}
impl ExecTrait<bool> for ExecNotEqual {
    fn exec(a: WordType, b: WordType) -> bool {
        a != b
    }
}

pub(super) struct ExecSignedGreatEqual {}
impl ExecTrait<bool> for ExecSignedGreatEqual {
    fn exec(a: WordType, b: WordType) -> bool {
        a.cast_signed() >= b.cast_signed()
    }
}

pub(super) struct ExecUnsignedGreatEqual {}
impl ExecTrait<bool> for ExecUnsignedGreatEqual {
    fn exec(a: WordType, b: WordType) -> bool {
        a >= b
    }
}
