//! Hardware backends. Only riscv64 touches real CSRs; other targets get
//! just enough to build and test the portable kernel logic.

cfg_if::cfg_if! {
    if #[cfg(target_arch = "riscv64")] {
        mod riscv64;
        pub use riscv64::*;
    } else {
        /// Stop making progress.
        pub fn halt() -> ! {
            loop {
                core::hint::spin_loop();
            }
        }

        pub fn idle() -> ! {
            halt()
        }
    }
}
