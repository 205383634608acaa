#![cfg_attr(not(test), no_std)]

pub mod boot;
pub use boot::{Region, SECTOR_SIZE, sector_offset};

pub mod registers;
pub use registers::Register;

pub mod syscall;
pub use syscall::Syscall;
