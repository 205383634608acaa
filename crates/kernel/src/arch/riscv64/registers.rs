use core::arch::asm;

use crate::csr::{Csr, PrivilegedRegisters};

macro_rules! csr_read {
    ($name:literal) => {{
        let value: usize;
        // SAFETY: reading a supervisor CSR from S-mode has no side effects.
        unsafe { asm!(concat!("csrr {0}, ", $name), out(reg) value, options(nomem, nostack)) };
        value
    }};
}

macro_rules! csr_write {
    ($name:literal, $value:expr) => {{
        let value: usize = $value;
        // SAFETY: callers of `PrivilegedRegisters::write` own the CSR protocol.
        unsafe { asm!(concat!("csrw ", $name, ", {0}"), in(reg) value, options(nostack)) };
    }};
}

/// The hart's own supervisor CSRs.
#[derive(Clone, Copy, Debug, Default)]
pub struct RiscvRegisters;

impl PrivilegedRegisters for RiscvRegisters {
    fn read(&self, csr: Csr) -> usize {
        match csr {
            Csr::Sstatus => csr_read!("sstatus"),
            Csr::Sie => csr_read!("sie"),
            Csr::Sip => csr_read!("sip"),
            Csr::Sepc => csr_read!("sepc"),
            Csr::Scause => csr_read!("scause"),
            Csr::Stval => csr_read!("stval"),
            Csr::Stvec => csr_read!("stvec"),
            Csr::Sscratch => csr_read!("sscratch"),
            Csr::Satp => csr_read!("satp"),
            Csr::Time => csr_read!("time"),
            // stimecmp (Sstc)
            Csr::Stimecmp => csr_read!("0x14d"),
        }
    }

    fn write(&mut self, csr: Csr, value: usize) {
        match csr {
            Csr::Sstatus => csr_write!("sstatus", value),
            Csr::Sie => csr_write!("sie", value),
            Csr::Sip => csr_write!("sip", value),
            Csr::Sepc => csr_write!("sepc", value),
            Csr::Scause => csr_write!("scause", value),
            Csr::Stval => csr_write!("stval", value),
            Csr::Stvec => csr_write!("stvec", value),
            Csr::Sscratch => csr_write!("sscratch", value),
            Csr::Satp => csr_write!("satp", value),
            Csr::Stimecmp => csr_write!("0x14d", value),
            Csr::Time => log::warn!(target: "trap", "ignoring write to read-only time CSR"),
        }
    }
}
