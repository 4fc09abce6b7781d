use std::fmt::Display;

use crate::{
    config::arch_config::WordType,
    isa::riscv::instruction::{
        InstrFormat, RV32Desc, RVInstrInfo,
        instr_table::{RiscvInstr, TABLE_RV32I, TABLE_RV32M, TABLE_RVSYSTEM, TABLE_RVZICSR},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeInstr(pub RiscvInstr, pub RVInstrInfo);

impl Display for DecodeInstr {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?} ({}), {:?}", self.0, self.0.isa_name(), self.1)
    }
}

const OPCODE_CNT: usize = 1 << 7;

/// Opcode-indexed decoder. Each bucket holds the table rows sharing one
/// opcode; rows inside a bucket are tried in table order.
pub struct Decoder {
    buckets: Vec<Vec<RV32Desc>>,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    pub fn new() -> Self {
        // RV32M goes first: its exact funct7 must win over the rows that
        // only look at funct7 bit 5.
        let isa = [TABLE_RV32M, TABLE_RV32I, TABLE_RVSYSTEM, TABLE_RVZICSR].concat();
        Self::from_isa(&isa)
    }

    pub fn from_isa(instrs: &[RV32Desc]) -> Self {
        let mut buckets = vec![Vec::new(); OPCODE_CNT];
        for desc in instrs {
            buckets[desc.opcode as usize].push(*desc);
        }

        log::debug!(
            "decoder has {} instructions in {} opcode classes.",
            instrs.len(),
            buckets.iter().filter(|b| !b.is_empty()).count()
        );

        Self { buckets }
    }

    /// `None` means the opcode belongs to no known class (illegal instruction).
    /// A known class with an unassigned `funct` field decodes to
    /// [`RiscvInstr::RESERVED`].
    pub fn decode(&self, raw_instr: u32) -> Option<DecodeInstr> {
        let bucket = &self.buckets[(raw_instr & 0x7F) as usize];
        if bucket.is_empty() {
            return None;
        }

        let decoded = bucket
            .iter()
            .find(|desc| desc.matches(raw_instr))
            .map(|desc| DecodeInstr(desc.instr, decode_info(raw_instr, desc.instr, desc.format)))
            .unwrap_or(DecodeInstr(RiscvInstr::RESERVED, RVInstrInfo::None));

        Some(decoded)
    }
}

fn decode_info(raw_instr: u32, instr: RiscvInstr, fmt: InstrFormat) -> RVInstrInfo {
    let rd = ((raw_instr >> 7) & 0b11111) as u8;
    let rs1 = ((raw_instr >> 15) & 0b11111) as u8;
    let rs2 = ((raw_instr >> 20) & 0b11111) as u8;

    match fmt {
        InstrFormat::R => RVInstrInfo::R { rd, rs1, rs2 },
        InstrFormat::I => {
            let mut imm = ((raw_instr >> 20) & 0xFFF) as WordType;

            if let RiscvInstr::SLLI | RiscvInstr::SRLI | RiscvInstr::SRAI = instr {
                imm &= 0x1F;
            }

            RVInstrInfo::I { rd, rs1, imm }
        }
        InstrFormat::S => {
            let imm = (((raw_instr >> 25) & 0x7F) << 5) | ((raw_instr >> 7) & 0b11111);
            RVInstrInfo::S { rs1, rs2, imm }
        }
        InstrFormat::U => RVInstrInfo::U {
            rd,
            imm: raw_instr & 0xFFFF_F000,
        },
        InstrFormat::B => {
            let imm = (((raw_instr >> 31) & 1) << 12)
                | (((raw_instr >> 7) & 1) << 11)
                | (((raw_instr >> 25) & 0b111111) << 5)
                | (((raw_instr >> 8) & 0b1111) << 1);
            RVInstrInfo::B { rs1, rs2, imm }
        }
        InstrFormat::J => {
            let imm = (((raw_instr >> 31) & 1) << 20)
                | (((raw_instr >> 12) & 0xFF) << 12)
                | (((raw_instr >> 20) & 1) << 11)
                | (((raw_instr >> 21) & 0x3FF) << 1);
            RVInstrInfo::J { rd, imm }
        }
        InstrFormat::None => RVInstrInfo::None,
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha12Rng;

    use crate::{
        isa::riscv::csr_reg::csr_index,
        utils::negative_of,
    };

    use super::*;

    fn get_instr_r(opcode: u8, funct3: u8, funct7: u8, rd: u8, rs1: u8, rs2: u8) -> u32 {
        (opcode as u32)
            | ((rd as u32) << 7)
            | ((funct3 as u32) << 12)
            | ((rs1 as u32) << 15)
            | ((rs2 as u32) << 20)
            | ((funct7 as u32) << 25)
    }

    fn get_instr_i(opcode: u8, funct3: u8, rd: u8, rs1: u8, imm: u32) -> u32 {
        (opcode as u32)
            | ((rd as u32) << 7)
            | ((funct3 as u32) << 12)
            | ((rs1 as u32) << 15)
            | (imm << 20)
    }

    fn get_instr_s(opcode: u8, funct3: u8, rs1: u8, rs2: u8, imm: u32) -> u32 {
        (opcode as u32)
            | ((imm & 0b11111) << 7)
            | ((funct3 as u32) << 12)
            | ((rs1 as u32) << 15)
            | ((rs2 as u32) << 20)
            | (((imm >> 5) & 0x7F) << 25)
    }

    fn get_instr_b(opcode: u8, funct3: u8, rs1: u8, rs2: u8, imm: u32) -> u32 {
        (opcode as u32)
            | ((imm >> 11) & 1) << 7
            | ((imm >> 1) & 0b1111) << 8
            | ((funct3 as u32) << 12)
            | ((rs1 as u32) << 15)
            | ((rs2 as u32) << 20)
            | ((imm >> 5) & 0x3F) << 25
            | ((imm >> 12) & 1) << 31
    }

    fn get_instr_u(opcode: u8, rd: u8, imm: u32) -> u32 {
        (opcode as u32) | ((rd as u32) << 7) | ((imm >> 12) << 12)
    }

    fn get_instr_j(opcode: u8, rd: u8, imm: u32) -> u32 {
        (opcode as u32)
            | ((rd as u32) << 7)
            | (((imm >> 12) & 0xFF) << 12)
            | (((imm >> 11) & 1) << 20)
            | (((imm >> 1) & 0x3FF) << 21)
            | (((imm >> 20) & 1) << 31)
    }

    struct Checker {
        decoder: Decoder,
        rng: ChaCha12Rng,
    }

    impl Checker {
        fn new() -> Self {
            Checker {
                decoder: Decoder::new(),
                rng: ChaCha12Rng::seed_from_u64(0x5EED),
            }
        }

        fn check(&mut self, instr: u32, expected: RiscvInstr, expected_info: RVInstrInfo) {
            let result = self.decoder.decode(instr).unwrap();
            assert_eq!(result, DecodeInstr(expected, expected_info), "raw {:#010x}", instr);
        }

        fn rand_reg(&mut self) -> u8 {
            self.rng.random_range(0..=0b11111) as u8
        }

        fn test_instr_r(&mut self, instr_kind: RiscvInstr, opcode: u8, funct3: u8, funct7: u8) {
            let (rd, rs1, rs2) = (self.rand_reg(), self.rand_reg(), self.rand_reg());

            let instr = get_instr_r(opcode, funct3, funct7, rd, rs1, rs2);
            self.check(instr, instr_kind, RVInstrInfo::R { rs1, rs2, rd });
        }

        fn test_instr_i(&mut self, instr_kind: RiscvInstr, opcode: u8, funct3: u8) {
            let (rd, rs1) = (self.rand_reg(), self.rand_reg());
            let imm = self.rng.random_range(0..=0xFFF) as u32;

            let instr = get_instr_i(opcode, funct3, rd, rs1, imm);
            self.check(instr, instr_kind, RVInstrInfo::I { rs1, rd, imm });
        }

        fn test_instr_s(&mut self, instr_kind: RiscvInstr, opcode: u8, funct3: u8) {
            let (rs1, rs2) = (self.rand_reg(), self.rand_reg());
            let imm = self.rng.random_range(0..=0xFFF) as u32;

            let instr = get_instr_s(opcode, funct3, rs1, rs2, imm);
            self.check(instr, instr_kind, RVInstrInfo::S { rs1, rs2, imm });
        }

        fn test_instr_b(&mut self, instr_kind: RiscvInstr, opcode: u8, funct3: u8) {
            let (rs1, rs2) = (self.rand_reg(), self.rand_reg());
            let imm = (self.rng.random_range(0..=0xFFF) as u32) << 1;

            let instr = get_instr_b(opcode, funct3, rs1, rs2, imm);
            self.check(instr, instr_kind, RVInstrInfo::B { rs1, rs2, imm });
        }

        fn test_instr_u(&mut self, instr_kind: RiscvInstr, opcode: u8) {
            let rd = self.rand_reg();
            let imm = (self.rng.random_range(0..=0xFFFFF) as u32) << 12;

            let instr = get_instr_u(opcode, rd, imm);
            self.check(instr, instr_kind, RVInstrInfo::U { rd, imm });
        }

        fn test_instr_j(&mut self, instr_kind: RiscvInstr, opcode: u8) {
            let rd = self.rand_reg();
            let imm = (self.rng.random_range(0..=0xFFFFF) as u32) << 1;

            let instr = get_instr_j(opcode, rd, imm);
            self.check(instr, instr_kind, RVInstrInfo::J { rd, imm });
        }
    }

    #[test]
    fn test_decoder() {
        let mut checker = Checker::new();

        for _ in 1..=1000 {
            checker.test_instr_r(RiscvInstr::ADD, 0b0110011, 0b000, 0b0000000);
            checker.test_instr_r(RiscvInstr::SUB, 0b0110011, 0b000, 0b0100000);
            checker.test_instr_r(RiscvInstr::SRA, 0b0110011, 0b101, 0b0100000);
            checker.test_instr_r(RiscvInstr::MULHSU, 0b0110011, 0b010, 0b0000001);
            checker.test_instr_r(RiscvInstr::REMU, 0b0110011, 0b111, 0b0000001);

            checker.test_instr_i(RiscvInstr::ADDI, 0b0010011, 0b000);
            checker.test_instr_i(RiscvInstr::ORI, 0b0010011, 0b110);
            checker.test_instr_i(RiscvInstr::LHU, 0b0000011, 0b101);
            checker.test_instr_i(RiscvInstr::JALR, 0b1100111, 0b000);
            checker.test_instr_i(RiscvInstr::CSRRSI, 0b1110011, 0b110);

            checker.test_instr_s(RiscvInstr::SB, 0b0100011, 0b000);
            checker.test_instr_s(RiscvInstr::SW, 0b0100011, 0b010);

            checker.test_instr_b(RiscvInstr::BNE, 0b1100011, 0b001);
            checker.test_instr_b(RiscvInstr::BGEU, 0b1100011, 0b111);

            checker.test_instr_u(RiscvInstr::LUI, 0b0110111);
            checker.test_instr_u(RiscvInstr::AUIPC, 0b0010111);

            checker.test_instr_j(RiscvInstr::JAL, 0b1101111);
        }
    }

    #[test]
    fn test_decoder_rv32i() {
        let mut checker = Checker::new();

        checker.check(
            0x123450b7,
            RiscvInstr::LUI,
            RVInstrInfo::U {
                rd: 1,
                imm: 0x12345000,
            },
        );

        checker.check(
            0x12233097,
            RiscvInstr::AUIPC,
            RVInstrInfo::U {
                rd: 1,
                imm: 0x12233000,
            },
        );

        checker.check(
            0xffb18113, // addi sp,gp,-5
            RiscvInstr::ADDI,
            RVInstrInfo::I {
                rs1: 3,
                rd: 2,
                imm: negative_of(5) & 0xFFF,
            },
        );

        checker.check(
            0x00210083, // lb ra,2(sp)
            RiscvInstr::LB,
            RVInstrInfo::I {
                rs1: 2,
                rd: 1,
                imm: 2,
            },
        );

        checker.check(
            0xf8c318e3, // bne t1,a2,-112
            RiscvInstr::BNE,
            RVInstrInfo::B {
                rs1: 6,
                rs2: 12,
                imm: negative_of(112) & 0x1FFF,
            },
        );

        checker.check(
            0x4027d793, // srai a5,a5,0x2
            RiscvInstr::SRAI,
            RVInstrInfo::I {
                rs1: 15,
                rd: 15,
                imm: 2,
            },
        );

        checker.check(0x0000000f, RiscvInstr::FENCE, RVInstrInfo::I { rs1: 0, rd: 0, imm: 0 });
        checker.check(0x00100073, RiscvInstr::EBREAK, RVInstrInfo::None);
        checker.check(0x00000073, RiscvInstr::ECALL, RVInstrInfo::None);
    }

    #[test]
    fn test_decoder_privilege() {
        let mut checker = Checker::new();

        checker.check(0x30200073, RiscvInstr::MRET, RVInstrInfo::None);
        checker.check(
            0x30529073, // csrw mtvec,t0
            RiscvInstr::CSRRW,
            RVInstrInfo::I {
                rs1: 5,
                rd: 0,
                imm: csr_index::mtvec as u32,
            },
        );
        checker.check(
            0x34202573, // csrr a0,mcause
            RiscvInstr::CSRRS,
            RVInstrInfo::I {
                rs1: 0,
                rd: 10,
                imm: csr_index::mcause as u32,
            },
        );
    }

    #[test]
    fn test_decoder_funct7_bit5() {
        let mut checker = Checker::new();
        let r = RVInstrInfo::R { rd: 1, rs1: 2, rs2: 3 };

        checker.check(get_instr_r(0b0110011, 0b000, 0b0010000, 1, 2, 3), RiscvInstr::ADD, r);
        checker.check(get_instr_r(0b0110011, 0b000, 0b0110000, 1, 2, 3), RiscvInstr::SUB, r);
        checker.check(get_instr_r(0b0110011, 0b101, 0b0000100, 1, 2, 3), RiscvInstr::SRL, r);
        checker.check(get_instr_r(0b0110011, 0b101, 0b0100001, 1, 2, 3), RiscvInstr::SRA, r);

        // RV32M keeps its exact funct7.
        checker.check(get_instr_r(0b0110011, 0b000, 0b0000001, 1, 2, 3), RiscvInstr::MUL, r);
        checker.check(get_instr_r(0b0110011, 0b101, 0b0000001, 1, 2, 3), RiscvInstr::DIVU, r);

        // srai with imm[11] set
        checker.check(
            get_instr_i(0b0010011, 0b101, 1, 2, 0xC03),
            RiscvInstr::SRAI,
            RVInstrInfo::I { rd: 1, rs1: 2, imm: 3 },
        );
    }

    #[test]
    fn test_decoder_reserved_and_illegal() {
        let mut checker = Checker::new();

        // wfi
        checker.check(0x10500073, RiscvInstr::RESERVED, RVInstrInfo::None);
        // slli with shamt[5] set is not RV32
        checker.check(0x02009093, RiscvInstr::RESERVED, RVInstrInfo::None);
        // sll with an unassigned funct7
        checker.check(
            get_instr_r(0b0110011, 0b001, 0b0100000, 1, 2, 3),
            RiscvInstr::RESERVED,
            RVInstrInfo::None,
        );

        assert_eq!(checker.decoder.decode(0x0000_0000), None);
        assert_eq!(checker.decoder.decode(0xFFFF_FFFF), None);
        // opcode of the A extension
        assert_eq!(checker.decoder.decode(0x0000_202F), None);
    }
}
