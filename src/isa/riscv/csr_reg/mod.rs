use bitflags::bitflags;
use log::{debug, warn};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use phf::phf_map;

use crate::config::arch_config::{MISA_VALUE, WordType};

/// Raw 12-bit addresses of the implemented machine-mode CSRs.
#[rustfmt::skip]
#[allow(non_upper_case_globals, unused)]
pub mod csr_index {
    pub const mstatus   : u16 = 0x300;    // interrupt enable and its saved copy
    pub const misa      : u16 = 0x301;    // supported ISA, read-only here
    pub const mie       : u16 = 0x304;    // per-line interrupt enable
    pub const mtvec     : u16 = 0x305;    // trap vector base
    pub const mscratch  : u16 = 0x340;    // scratch for trap handlers
    pub const mepc      : u16 = 0x341;    // trap return address
    pub const mcause    : u16 = 0x342;    // trap cause
    pub const mtval     : u16 = 0x343;    // trap value
    pub const mip       : u16 = 0x344;    // interrupt pending
}

pub const MTVEC_RESET: WordType = 0x100;

#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
pub enum CsrAddr {
    Mstatus = 0x300,
    Misa = 0x301,
    Mie = 0x304,
    Mtvec = 0x305,
    Mscratch = 0x340,
    Mepc = 0x341,
    Mcause = 0x342,
    Mtval = 0x343,
    Mip = 0x344,
}

pub const CSR_COUNT: usize = 9;

pub const CSR_NAME: phf::Map<u16, &'static str> = phf_map! {
    0x300u16 => "mstatus",
    0x301u16 => "misa",
    0x304u16 => "mie",
    0x305u16 => "mtvec",
    0x340u16 => "mscratch",
    0x341u16 => "mepc",
    0x342u16 => "mcause",
    0x343u16 => "mtval",
    0x344u16 => "mip",
};

impl CsrAddr {
    pub const ALL: [CsrAddr; CSR_COUNT] = [
        CsrAddr::Mstatus,
        CsrAddr::Misa,
        CsrAddr::Mie,
        CsrAddr::Mtvec,
        CsrAddr::Mscratch,
        CsrAddr::Mepc,
        CsrAddr::Mcause,
        CsrAddr::Mtval,
        CsrAddr::Mip,
    ];

    fn slot(self) -> usize {
        match self {
            CsrAddr::Mstatus => 0,
            CsrAddr::Misa => 1,
            CsrAddr::Mie => 2,
            CsrAddr::Mtvec => 3,
            CsrAddr::Mscratch => 4,
            CsrAddr::Mepc => 5,
            CsrAddr::Mcause => 6,
            CsrAddr::Mtval => 7,
            CsrAddr::Mip => 8,
        }
    }

    pub fn name(self) -> &'static str {
        CSR_NAME.get(&u16::from(self)).copied().unwrap_or("unknown")
    }

    /// Bits that a CSR instruction may set.
    fn write_mask(self) -> WordType {
        match self {
            CsrAddr::Misa => 0,
            CsrAddr::Mtvec => !0b11,
            CsrAddr::Mepc => !0b1,
            _ => !0,
        }
    }
}

bitflags! {
    /// The `mstatus` fields this core implements.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Mstatus: WordType {
        const MIE = 1 << 3;
        const MPIE = 1 << 7;
    }

    /// Machine interrupt lines, laid out as in `mie` / `mip`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct InterruptBits: WordType {
        const MSI = 1 << 3;
        const MTI = 1 << 7;
        const MEI = 1 << 11;
    }
}

pub struct CsrRegFile {
    table: [WordType; CSR_COUNT],
    interrupts_enabled: bool,
}

impl CsrRegFile {
    pub fn new() -> Self {
        let mut table = [0; CSR_COUNT];
        table[CsrAddr::Misa.slot()] = MISA_VALUE;
        table[CsrAddr::Mtvec.slot()] = MTVEC_RESET;

        Self {
            table,
            interrupts_enabled: false,
        }
    }

    /// `None` for an address this core does not implement.
    pub fn read(&self, addr: u16) -> Option<WordType> {
        CsrAddr::try_from(addr).ok().map(|csr| self.get(csr))
    }

    /// Instruction-side write. Applies per-register masks; `misa` ignores it.
    ///
    /// Returns `false` for an address this core does not implement.
    pub fn write(&mut self, addr: u16, value: WordType) -> bool {
        let Ok(csr) = CsrAddr::try_from(addr) else {
            warn!("write to unimplemented CSR {:#05x} ignored", addr);
            return false;
        };

        if csr == CsrAddr::Misa {
            debug!("write to misa ignored");
            return true;
        }

        let value = value & csr.write_mask();
        debug!("CSR {} <- {:#010x}", csr.name(), value);
        self.set_directly(csr, value);
        true
    }

    pub fn get(&self, csr: CsrAddr) -> WordType {
        self.table[csr.slot()]
    }

    /// Write without masking. Keeps the cached global interrupt enable in step
    /// with `mstatus`.
    pub fn set_directly(&mut self, csr: CsrAddr, value: WordType) {
        self.table[csr.slot()] = value;
        if csr == CsrAddr::Mstatus {
            self.interrupts_enabled = Mstatus::from_bits_retain(value).contains(Mstatus::MIE);
        }
    }

    pub fn mstatus(&self) -> Mstatus {
        Mstatus::from_bits_retain(self.get(CsrAddr::Mstatus))
    }

    pub fn set_mstatus(&mut self, mstatus: Mstatus) {
        self.set_directly(CsrAddr::Mstatus, mstatus.bits());
    }

    pub fn mie(&self) -> InterruptBits {
        InterruptBits::from_bits_truncate(self.get(CsrAddr::Mie))
    }

    /// Global machine interrupt enable, mirrored from `mstatus.MIE`.
    pub fn interrupts_enabled(&self) -> bool {
        self.interrupts_enabled
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reset_values() {
        let csr = CsrRegFile::new();
        assert_eq!(csr.read(csr_index::misa), Some(0x4000_1100));
        assert_eq!(csr.read(csr_index::mtvec), Some(MTVEC_RESET));
        assert_eq!(csr.read(csr_index::mstatus), Some(0));
        assert!(!csr.interrupts_enabled());
    }

    #[test]
    fn field_masks() {
        let mut csr = CsrRegFile::new();
        csr.write(csr_index::mtvec, 0x203);
        csr.write(csr_index::mepc, 0x1235);
        csr.write(csr_index::misa, 0);
        csr.write(csr_index::mscratch, 0xFFFF_FFFF);

        assert_eq!(csr.get(CsrAddr::Mtvec), 0x200);
        assert_eq!(csr.get(CsrAddr::Mepc), 0x1234);
        assert_eq!(csr.get(CsrAddr::Misa), 0x4000_1100);
        assert_eq!(csr.get(CsrAddr::Mscratch), 0xFFFF_FFFF);
    }

    #[test]
    fn mstatus_write_updates_enable() {
        let mut csr = CsrRegFile::new();
        csr.write(csr_index::mstatus, 0x8);
        assert!(csr.interrupts_enabled());
        csr.write(csr_index::mstatus, 0x80);
        assert!(!csr.interrupts_enabled());
        assert_eq!(csr.mstatus(), Mstatus::MPIE);
    }

    #[test]
    fn unimplemented_csr() {
        let mut csr = CsrRegFile::new();
        assert_eq!(csr.read(0xC00), None);
        assert!(!csr.write(0xC00, 1));
    }

    #[test]
    fn csr_names() {
        for csr in CsrAddr::ALL {
            assert_ne!(csr.name(), "unknown");
        }
        assert_eq!(CsrAddr::Mcause.name(), "mcause");
    }
}
