use log::{error, info};
use loader::ExecutableImage;

use crate::csr::{Csr, Interrupts, PrivilegedRegisters, Sstatus};
use crate::trap::FatalTrap;

/// Loads the user stack pointer and executes `sret`.
pub trait ModeSwitch {
    /// # Safety
    /// `sepc` and `sstatus` must describe a valid user-mode entry and
    /// `stack_top` must point at the top of mapped user memory.
    unsafe fn switch(&mut self, stack_top: usize);
}

/// One-shot drop from supervisor to user mode.
///
/// Only obtainable from a loaded [`ExecutableImage`], so a failed load can
/// never reach user mode.
#[derive(Debug, PartialEq, Eq)]
pub struct PrivilegeTransition {
    entry: usize,
    stack_top: usize,
}

impl PrivilegeTransition {
    pub fn new(image: &ExecutableImage, stack_top: usize) -> Self {
        Self {
            entry: image.entry() as usize,
            stack_top,
        }
    }

    pub fn entry(&self) -> usize {
        self.entry
    }

    pub fn stack_top(&self) -> usize {
        self.stack_top
    }

    /// Program the registers `sret` consumes.
    pub fn prepare<R: PrivilegedRegisters + ?Sized>(&self, regs: &mut R) {
        let enabled = Interrupts::SOFTWARE | Interrupts::TIMER | Interrupts::EXTERNAL;
        regs.set_bits(Csr::Sie, enabled.bits());
        regs.write(Csr::Sepc, self.entry);
        regs.clear_bits(Csr::Sstatus, Sstatus::SPP.bits());
        regs.set_bits(Csr::Sstatus, Sstatus::SPIE.bits());
    }

    /// Enter user mode. Only returns if the switch itself failed.
    pub fn enter<R, M>(self, regs: &mut R, switch: &mut M) -> FatalTrap
    where
        R: PrivilegedRegisters + ?Sized,
        M: ModeSwitch + ?Sized,
    {
        self.prepare(regs);
        info!(
            target: "boot",
            "entering user mode at {:#x}, sp={:#x}",
            self.entry, self.stack_top
        );
        // SAFETY: `prepare` set sepc to the loaded entry with SPP=User.
        unsafe { switch.switch(self.stack_top) };

        let fatal = FatalTrap::ReturnedFromUser;
        error!(target: "boot", "{fatal}");
        fatal
    }
}
