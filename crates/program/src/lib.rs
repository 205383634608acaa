#![cfg_attr(not(test), no_std)]
//! User-space runtime: `ecall` wrappers, console printing and the program
//! entry point.

pub mod syscall;
#[macro_use]
pub mod print;
#[macro_use]
pub mod entrypoint;
mod panic;

pub use syscall::{
    close, exec, exit, fork, getpid, open, read, sleep, time, wait, write, yield_now,
};
pub use types::syscall::{STDIN, STDOUT, SYSCALL_ERROR};
