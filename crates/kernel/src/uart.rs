use bitflags::bitflags;

use crate::console::OutputSink;

const THR: usize = 0;
const IER: usize = 1;
const FCR: usize = 2;
const LCR: usize = 3;
const LSR: usize = 5;

bitflags! {
    /// Line status flags
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    struct LineStatus: u8 {
        const INPUT_FULL = 1;
        const OUTPUT_EMPTY = 1 << 5;
    }
}

/// Polled driver for a 16550-compatible UART.
#[derive(Clone, Copy, Debug)]
pub struct Uart16550 {
    base: usize,
}

impl Uart16550 {
    /// # Safety
    /// `base` must be the MMIO base of a 16550 UART, and only written through
    /// this driver.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// 8N1, FIFOs enabled, interrupts off.
    pub fn init(&self) {
        self.write_reg(IER, 0x00);
        self.write_reg(LCR, 0x03);
        self.write_reg(FCR, 0x07);
    }

    fn line_status(&self) -> LineStatus {
        LineStatus::from_bits_truncate(self.read_reg(LSR))
    }

    fn read_reg(&self, reg: usize) -> u8 {
        // SAFETY: `new` guarantees a valid MMIO base.
        unsafe { ((self.base + reg) as *const u8).read_volatile() }
    }

    fn write_reg(&self, reg: usize, value: u8) {
        // SAFETY: `new` guarantees a valid MMIO base.
        unsafe { ((self.base + reg) as *mut u8).write_volatile(value) }
    }
}

impl OutputSink for Uart16550 {
    fn put(&self, byte: u8) {
        while !self.line_status().contains(LineStatus::OUTPUT_EMPTY) {
            core::hint::spin_loop();
        }
        self.write_reg(THR, byte);
    }
}
