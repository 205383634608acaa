//! Supervisor control and status registers, behind a capability trait.
//!
//! Everything that touches privileged state (the trap dispatcher, the timer,
//! the user-mode transition) goes through [`PrivilegedRegisters`], so the
//! logic can be driven by a fake on the host.

use bitflags::bitflags;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Csr {
    Sstatus,
    Sie,
    Sip,
    Sepc,
    Scause,
    Stval,
    Stvec,
    Sscratch,
    Satp,
    /// Read-only `time` counter.
    Time,
    /// Sstc timer compare register.
    Stimecmp,
}

pub trait PrivilegedRegisters {
    fn read(&self, csr: Csr) -> usize;
    fn write(&mut self, csr: Csr, value: usize);

    fn set_bits(&mut self, csr: Csr, mask: usize) {
        let value = self.read(csr);
        self.write(csr, value | mask);
    }

    fn clear_bits(&mut self, csr: Csr, mask: usize) {
        let value = self.read(csr);
        self.write(csr, value & !mask);
    }
}

bitflags! {
    /// The `sstatus` bits the kernel manipulates.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Sstatus: usize {
        const SIE = 1 << 1;
        const SPIE = 1 << 5;
        const SPP = 1 << 8;
    }
}

bitflags! {
    /// Supervisor interrupt bits, shared by `sie` and `sip`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Interrupts: usize {
        const SOFTWARE = 1 << 1;
        const TIMER = 1 << 5;
        const EXTERNAL = 1 << 9;
    }
}

/// Privilege level a trap was taken from, as recorded in `sstatus.SPP`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Privilege {
    User,
    Supervisor,
}

impl Privilege {
    pub fn previous(sstatus: usize) -> Self {
        if Sstatus::from_bits_truncate(sstatus).contains(Sstatus::SPP) {
            Privilege::Supervisor
        } else {
            Privilege::User
        }
    }
}
