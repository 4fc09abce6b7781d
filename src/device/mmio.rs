use crate::{
    config::arch_config::WordType,
    device::{
        DeviceTrait, Mem, MemSize,
        aclint::Clint,
        config::{CLINT_BASE, CLINT_SIZE, UART_BASE, UART_SIZE},
        uart::Uart,
    },
    ram::Ram,
    rom::Rom,
    utils::truncate_to_bytes,
};

/// The whole physical address space: devices first, then RAM over ROM.
///
/// ```ignore
/// let mut mmio = MemoryMapIO::new(rom);
/// mmio.write(0x1000, 0xdead_beef, MemSize::Word);
/// let b = mmio.read(0x1001, MemSize::Byte); // 0xbe
/// mmio.write(UART_BASE, b'A' as WordType, MemSize::Byte);
/// ```
pub struct MemoryMapIO {
    rom: Rom,
    ram: Ram,
    uart: Uart,
    clint: Clint,
}

impl MemoryMapIO {
    pub fn new(rom: Rom) -> Self {
        Self {
            rom,
            ram: Ram::new(),
            uart: Uart::new(),
            clint: Clint::new(),
        }
    }

    fn device_at(&mut self, p_addr: WordType) -> Option<(&mut dyn DeviceTrait, WordType)> {
        if p_addr.wrapping_sub(UART_BASE) < UART_SIZE {
            let uart: &mut dyn DeviceTrait = &mut self.uart;
            Some((uart, p_addr - UART_BASE))
        } else if p_addr.wrapping_sub(CLINT_BASE) < CLINT_SIZE {
            let clint: &mut dyn DeviceTrait = &mut self.clint;
            Some((clint, p_addr - CLINT_BASE))
        } else {
            None
        }
    }

    fn read_byte(&self, p_addr: WordType) -> u8 {
        self.ram
            .read_byte(p_addr)
            .or_else(|| self.rom.byte(p_addr))
            .unwrap_or(0)
    }

    /// Whether any byte of the access has ROM or RAM content behind it.
    pub fn is_backed(&self, p_addr: WordType, size: MemSize) -> bool {
        (0..size.bytes()).any(|i| {
            let addr = p_addr.wrapping_add(i);
            self.ram.contains(addr) || self.rom.word(addr).is_some()
        })
    }

    pub fn step_devices(&mut self) {
        self.uart.step();
        self.clint.step();
    }

    pub fn rom(&self) -> &Rom {
        &self.rom
    }

    pub fn ram(&self) -> &Ram {
        &self.ram
    }

    pub fn uart(&self) -> &Uart {
        &self.uart
    }

    pub fn clint(&self) -> &Clint {
        &self.clint
    }
}

impl Mem for MemoryMapIO {
    fn read(&mut self, p_addr: WordType, size: MemSize) -> WordType {
        if let Some((device, offset)) = self.device_at(p_addr) {
            if let Some(value) = device.read(offset) {
                return truncate_to_bytes(value, size.bytes());
            }
        }

        // Byte by byte: the access may be unaligned or straddle RAM and ROM.
        (0..size.bytes()).fold(0, |acc, i| {
            acc | ((self.read_byte(p_addr.wrapping_add(i)) as WordType) << (i * 8))
        })
    }

    fn write(&mut self, p_addr: WordType, data: WordType, size: MemSize) {
        if let Some((device, offset)) = self.device_at(p_addr) {
            if device.write(offset, data) {
                return;
            }
        }

        for i in 0..size.bytes() {
            self.ram
                .write_byte(p_addr.wrapping_add(i), (data >> (i * 8)) as u8);
        }
    }
}
