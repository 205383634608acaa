use core::arch::asm;

mod registers;
mod trap;

pub use registers::RiscvRegisters;
pub use trap::{SretSwitch, trap_entry_address};

/// Park the hart with interrupts masked. Used after a fatal trap.
pub fn halt() -> ! {
    loop {
        // SAFETY: clearing sstatus.SIE and waiting has no other effect.
        unsafe { asm!("csrci sstatus, 2", "wfi", options(nomem, nostack)) };
    }
}

/// Wait for interrupts forever.
pub fn idle() -> ! {
    loop {
        // SAFETY: wfi only stalls the hart.
        unsafe { asm!("wfi", options(nomem, nostack)) };
    }
}
