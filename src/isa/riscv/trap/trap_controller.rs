use log::debug;

use crate::{
    config::arch_config::WordType,
    isa::riscv::{
        csr_reg::{CsrAddr, Mstatus},
        executor::RV32CPU,
        trap::{Interrupt, Trap},
    },
};

pub(in crate::isa::riscv) struct TrapController {}

impl TrapController {
    /// Enter the handler at `mtvec`. Shared by exceptions and interrupts.
    pub fn send_trap_signal(cpu: &mut RV32CPU, cause: Trap, trap_value: WordType) {
        debug!(
            "trap {:?} at pc {:#010x}, tval {:#x}",
            cause, cpu.pc, trap_value
        );

        cpu.csr.set_directly(CsrAddr::Mepc, cpu.pc);
        cpu.csr.set_directly(CsrAddr::Mcause, cause.cause());
        cpu.csr.set_directly(CsrAddr::Mtval, trap_value);

        let mut mstatus = cpu.csr.mstatus();
        mstatus.set(Mstatus::MPIE, mstatus.contains(Mstatus::MIE));
        mstatus.remove(Mstatus::MIE);
        cpu.csr.set_mstatus(mstatus);

        cpu.pc = cpu.csr.get(CsrAddr::Mtvec);
        cpu.in_exception = true;

        if let Trap::Interrupt(interrupt) = cause {
            cpu.pending.remove(interrupt.bit());
        }
    }

    pub fn mret(cpu: &mut RV32CPU) {
        let from = cpu.pc;
        cpu.pc = cpu.csr.get(CsrAddr::Mepc);

        let mut mstatus = cpu.csr.mstatus();
        mstatus.set(Mstatus::MIE, mstatus.contains(Mstatus::MPIE));
        mstatus.remove(Mstatus::MPIE);
        cpu.csr.set_mstatus(mstatus);

        cpu.in_exception = false;
        debug!("mret to {:#010x} from {:#010x}", cpu.pc, from);
    }

    /// The highest priority interrupt that is pending, enabled in `mie`
    /// and globally enabled.
    pub fn check_interrupt(cpu: &RV32CPU) -> Option<Interrupt> {
        if !cpu.csr.interrupts_enabled() {
            return None;
        }

        let eligible = cpu.pending & cpu.csr.mie();
        Interrupt::PRIORITY
            .into_iter()
            .find(|irq| eligible.contains(irq.bit()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::isa::riscv::{
        cpu_tester::{run_test_cpu_step, run_test_exec_decode},
        csr_reg::{InterruptBits, csr_index},
        trap::Exception,
    };

    const IRQ_HANDLER_ADDR: WordType = 0x2000;

    #[test]
    fn test_illegal_instr() {
        run_test_cpu_step(
            &[0xFFFF_FFFF],
            |builder| builder.csr(csr_index::mtvec, IRQ_HANDLER_ADDR).reg(5, 7),
            |checker| {
                checker
                    .pc(IRQ_HANDLER_ADDR)
                    .csr(csr_index::mepc, 0)
                    .csr(csr_index::mcause, Exception::IllegalInstruction.into())
                    .csr(csr_index::mtval, 0xFFFF_FFFF)
                    .reg(5, 7)
                    .customized(|checker| {
                        assert!(checker.cpu.in_exception);
                        checker
                    })
            },
        );
    }

    #[test]
    fn test_ecall_and_ebreak() {
        run_test_exec_decode(
            0x0000_0073, // ecall
            |builder| builder.csr(csr_index::mtvec, IRQ_HANDLER_ADDR).pc(0x40),
            |checker| {
                checker
                    .pc(IRQ_HANDLER_ADDR)
                    .csr(csr_index::mepc, 0x40)
                    .csr(csr_index::mcause, 11)
                    .csr(csr_index::mtval, 0)
            },
        );

        run_test_exec_decode(
            0x0010_0073, // ebreak
            |builder| builder.csr(csr_index::mtvec, IRQ_HANDLER_ADDR).pc(0x44),
            |checker| {
                checker
                    .pc(IRQ_HANDLER_ADDR)
                    .csr(csr_index::mepc, 0x44)
                    .csr(csr_index::mcause, 3)
            },
        );
    }

    #[test]
    fn test_trap_saves_enable() {
        run_test_exec_decode(
            0x0000_0073, // ecall
            |builder| builder.csr(csr_index::mstatus, Mstatus::MIE.bits()),
            |checker| {
                checker
                    .csr(csr_index::mstatus, Mstatus::MPIE.bits())
                    .customized(|checker| {
                        assert!(!checker.cpu.csr.interrupts_enabled());
                        checker
                    })
            },
        );
    }

    #[test]
    fn test_mret_restores_state() {
        run_test_cpu_step(
            &[0x0000_0073], // ecall
            |builder| {
                builder
                    .csr(csr_index::mstatus, Mstatus::MIE.bits())
                    .csr(csr_index::mtvec, IRQ_HANDLER_ADDR)
                    .mem(IRQ_HANDLER_ADDR, 0x3020_0073) // mret
            },
            |checker| {
                checker.customized(|checker| {
                    checker.cpu.step();
                    assert_eq!(checker.cpu.pc, 0);
                    assert!(!checker.cpu.in_exception);
                    assert!(checker.cpu.csr.interrupts_enabled());
                    assert_eq!(checker.cpu.csr.mstatus(), Mstatus::MIE);
                    checker
                })
            },
        );
    }

    #[test]
    fn test_mret_with_enable_clear() {
        run_test_exec_decode(
            0x3020_0073, // mret
            |builder| {
                builder
                    .csr(csr_index::mepc, 0x124)
                    .csr(csr_index::mstatus, 0)
                    .pc(0x300)
            },
            |checker| {
                checker.pc(0x124).csr(csr_index::mstatus, 0).customized(|checker| {
                    assert!(!checker.cpu.csr.interrupts_enabled());
                    checker
                })
            },
        );
    }

    #[test]
    fn test_interrupt_gating_and_priority() {
        let mut cpu = RV32CPU::default();
        cpu.pending = InterruptBits::all();
        assert_eq!(TrapController::check_interrupt(&cpu), None);

        cpu.csr.write(csr_index::mstatus, Mstatus::MIE.bits());
        assert_eq!(TrapController::check_interrupt(&cpu), None);

        cpu.csr.write(csr_index::mie, InterruptBits::all().bits());
        assert_eq!(
            TrapController::check_interrupt(&cpu),
            Some(Interrupt::MachineTimer)
        );

        cpu.pending.remove(InterruptBits::MTI);
        assert_eq!(
            TrapController::check_interrupt(&cpu),
            Some(Interrupt::MachineSoft)
        );

        cpu.pending.remove(InterruptBits::MSI);
        assert_eq!(
            TrapController::check_interrupt(&cpu),
            Some(Interrupt::MachineExternal)
        );

        cpu.csr.write(csr_index::mie, InterruptBits::MTI.bits());
        assert_eq!(TrapController::check_interrupt(&cpu), None);
    }

    #[test]
    fn test_interrupt_entry_clears_pending() {
        let mut cpu = RV32CPU::default();
        cpu.pc = 0x88;
        cpu.pending = InterruptBits::MEI | InterruptBits::MSI;

        TrapController::send_trap_signal(&mut cpu, Trap::Interrupt(Interrupt::MachineExternal), 0);

        assert_eq!(cpu.pending, InterruptBits::MSI);
        assert_eq!(cpu.csr.get(CsrAddr::Mcause), 0x8000_000B);
        assert_eq!(cpu.csr.get(CsrAddr::Mepc), 0x88);
        assert_eq!(cpu.pc, crate::isa::riscv::csr_reg::MTVEC_RESET);
    }
}
