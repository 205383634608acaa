#![cfg_attr(not(test), no_std)]

pub mod arch;
pub mod config;
pub mod console;
pub mod csr;
pub mod global;
pub mod init;
pub mod logger;
pub mod privilege;
pub mod syscall;
pub mod timer;
pub mod trap;
pub mod uart;

pub use config::Config;
pub use console::{Console, OutputSink};
pub use csr::{Csr, PrivilegedRegisters};
pub use init::{Kernel, TrapVector};
pub use privilege::{ModeSwitch, PrivilegeTransition};
pub use timer::TimerService;
pub use trap::{FatalTrap, TrapContext, TrapDispatcher, TrapOutcome};
pub use uart::Uart16550;
