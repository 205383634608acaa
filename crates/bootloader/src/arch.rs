//! Machine-mode primitives; only meaningful on riscv64 hardware.

cfg_if::cfg_if! {
    if #[cfg(target_arch = "riscv64")] {
        use core::arch::asm;

        use crate::machine::{
            MCOUNTEREN_TM, MEDELEG, MENVCFG_STCE, MIDELEG, PMPADDR0_ALL, PMPCFG0_TOR_RWX,
            mstatus_for_supervisor,
        };

        pub fn read_misa() -> usize {
            let misa: usize;
            // SAFETY: reading misa has no side effects.
            unsafe { asm!("csrr {0}, misa", out(reg) misa, options(nomem, nostack)) };
            misa
        }

        /// Hand the hart to S-mode code at `entry`.
        ///
        /// # Safety
        /// `entry` must be the entry point of a loaded supervisor image.
        pub unsafe fn enter_supervisor(entry: usize) {
            let mut mstatus: usize;
            unsafe {
                asm!("csrr {0}, mstatus", out(reg) mstatus);
                mstatus = mstatus_for_supervisor(mstatus);
                asm!(
                    "csrw medeleg, {medeleg}",
                    "csrw mideleg, {mideleg}",
                    "csrw pmpaddr0, {pmpaddr}",
                    "csrw pmpcfg0, {pmpcfg}",
                    // menvcfg
                    "csrs 0x30a, {stce}",
                    "csrs mcounteren, {tm}",
                    "csrw mepc, {entry}",
                    "csrw mstatus, {mstatus}",
                    "mret",
                    medeleg = in(reg) MEDELEG,
                    mideleg = in(reg) MIDELEG,
                    pmpaddr = in(reg) PMPADDR0_ALL,
                    pmpcfg = in(reg) PMPCFG0_TOR_RWX,
                    stce = in(reg) MENVCFG_STCE,
                    tm = in(reg) MCOUNTEREN_TM,
                    entry = in(reg) entry,
                    mstatus = in(reg) mstatus,
                );
            }
        }

        pub fn park() -> ! {
            loop {
                // SAFETY: wfi only stalls the hart.
                unsafe { asm!("wfi", options(nomem, nostack)) };
            }
        }
    } else {
        /// Hosts report an RV64 core with S and U modes.
        pub fn read_misa() -> usize {
            (2 << 62) | (1 << 8) | (1 << 18) | (1 << 20)
        }

        pub fn park() -> ! {
            loop {
                core::hint::spin_loop();
            }
        }
    }
}
