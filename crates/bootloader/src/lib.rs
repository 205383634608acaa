#![cfg_attr(not(test), no_std)]
//! Stage-0 boot for the QEMU `virt` machine.
//!
//! Runs in M-mode straight out of reset:
//! - loads the kernel ELF from sector 4 of the preloaded disk,
//! - delegates traps and the timer to S-mode,
//! - enters the kernel with `mret`.
//!
//! Everything up to the final mode switch is target-independent and tested on
//! the host.

pub mod arch;
pub mod bootloader;
pub mod isa;
pub mod machine;

pub use bootloader::{BootConfig, BootError, Bootloader, KernelHandoff};
pub use isa::Isa;
