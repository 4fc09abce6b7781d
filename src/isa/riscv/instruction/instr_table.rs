use crate::define_riscv_isa;

#[rustfmt::skip]
define_riscv_isa!(
    RiscvInstr,
    RV32I, TABLE_RV32I, {
        // Upper immediate / jumps
        LUI     => U [0b0110111],
        AUIPC   => U [0b0010111],
        JAL     => J [0b1101111],
        JALR    => I [0b1100111, 0b000],

        // Branch
        BEQ     => B [0b1100011, 0b000],
        BNE     => B [0b1100011, 0b001],
        BLT     => B [0b1100011, 0b100],
        BGE     => B [0b1100011, 0b101],
        BLTU    => B [0b1100011, 0b110],
        BGEU    => B [0b1100011, 0b111],

        // Load
        LB      => I [0b0000011, 0b000],
        LH      => I [0b0000011, 0b001],
        LW      => I [0b0000011, 0b010],
        LBU     => I [0b0000011, 0b100],
        LHU     => I [0b0000011, 0b101],

        // Store
        SB      => S [0b0100011, 0b000],
        SH      => S [0b0100011, 0b001],
        SW      => S [0b0100011, 0b010],

        // Arith immediate
        ADDI    => I [0b0010011, 0b000],
        SLTI    => I [0b0010011, 0b010],
        SLTIU   => I [0b0010011, 0b011],
        XORI    => I [0b0010011, 0b100],
        ORI     => I [0b0010011, 0b110],
        ANDI    => I [0b0010011, 0b111],
        SLLI    => I [0b0010011, 0b001, 0b0000000],
        SRLI    => I [0b0010011, 0b101, 0b0000000] / 0b0100000,
        SRAI    => I [0b0010011, 0b101, 0b0100000] / 0b0100000,

        // Arith register
        // funct7 bit 5 alone picks ADD/SUB and SRL/SRA. RV32M rows are
        // matched first, see `Decoder::new`.
        ADD     => R [0b0110011, 0b000, 0b0000000] / 0b0100000,
        SUB     => R [0b0110011, 0b000, 0b0100000] / 0b0100000,
        SLL     => R [0b0110011, 0b001, 0b0000000],
        SLT     => R [0b0110011, 0b010, 0b0000000],
        SLTU    => R [0b0110011, 0b011, 0b0000000],
        XOR     => R [0b0110011, 0b100, 0b0000000],
        SRL     => R [0b0110011, 0b101, 0b0000000] / 0b0100000,
        SRA     => R [0b0110011, 0b101, 0b0100000] / 0b0100000,
        OR      => R [0b0110011, 0b110, 0b0000000],
        AND     => R [0b0110011, 0b111, 0b0000000],

        // FENCE and FENCE.I; single hart, nothing to order.
        FENCE   => I [0b0001111],
    },
    RV32M, TABLE_RV32M, {
        MUL     => R [0b0110011, 0b000, 0b0000001],
        MULH    => R [0b0110011, 0b001, 0b0000001],
        MULHSU  => R [0b0110011, 0b010, 0b0000001],
        MULHU   => R [0b0110011, 0b011, 0b0000001],
        DIV     => R [0b0110011, 0b100, 0b0000001],
        DIVU    => R [0b0110011, 0b101, 0b0000001],
        REM     => R [0b0110011, 0b110, 0b0000001],
        REMU    => R [0b0110011, 0b111, 0b0000001],
    },
    RVSYSTEM, TABLE_RVSYSTEM, {
        ECALL   => None [0x0000_0073],
        EBREAK  => None [0x0010_0073],
        MRET    => None [0x3020_0073],
    },
    RVZICSR, TABLE_RVZICSR, {
        CSRRW   => I [0b1110011, 0b001],
        CSRRS   => I [0b1110011, 0b010],
        CSRRC   => I [0b1110011, 0b011],
        CSRRWI  => I [0b1110011, 0b101],
        CSRRSI  => I [0b1110011, 0b110],
        CSRRCI  => I [0b1110011, 0b111],
    },
);
