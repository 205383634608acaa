//! System-call routing for traps raised by `ecall` from user mode.
//!
//! Numbers are resolved through [`Syscall`] into a fixed handler table.
//! Failures never escape as errors: unknown or unsupported requests are
//! logged and answered with `-1`.

use log::{info, warn};
use loader::PhysRegion;
use types::Syscall;
use types::syscall::SYSCALL_ERROR;

use crate::console::OutputSink;
use crate::csr::PrivilegedRegisters;
use crate::timer::TimerService;
use crate::trap::TrapContext;

mod io;
mod process;
mod time;

/// A decoded `ecall`: number from `a7`, arguments from `a0..a5`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyscallRequest {
    pub number: usize,
    pub args: [usize; 6],
}

impl SyscallRequest {
    pub const fn new(number: usize, args: [usize; 6]) -> Self {
        Self { number, args }
    }
}

impl From<&TrapContext> for SyscallRequest {
    fn from(ctx: &TrapContext) -> Self {
        Self {
            number: ctx.syscall_number(),
            args: ctx.syscall_args(),
        }
    }
}

/// Kernel services a handler may use.
pub struct SyscallContext<'a> {
    pub console: &'a dyn OutputSink,
    pub regs: &'a dyn PrivilegedRegisters,
    pub timer: &'a TimerService,
    /// Memory user pointers are resolved against.
    pub memory: &'a PhysRegion<'a>,
}

pub type Handler = fn(&SyscallContext<'_>, &[usize; 6]) -> isize;

/// Indexed by `Syscall::index()`.
static HANDLERS: [Handler; Syscall::COUNT] = [
    io::sys_write,
    process::sys_exit,
    process::sys_getpid,
    time::sys_sleep,
    time::sys_yield,
    time::sys_time,
    process::sys_exec,
    process::sys_fork,
    process::sys_wait,
    io::sys_open,
    io::sys_close,
    io::sys_read,
];

pub fn handler(syscall: Syscall) -> Handler {
    HANDLERS[syscall.index()]
}

/// Run `request` and return the value destined for `a0`.
pub fn route(request: SyscallRequest, ctx: &SyscallContext<'_>) -> isize {
    let result = match Syscall::try_from(request.number) {
        Ok(syscall) => handler(syscall)(ctx, &request.args),
        Err(number) => {
            warn!(target: "syscall", "unknown syscall {number}");
            SYSCALL_ERROR
        }
    };
    info!(
        target: "syscall",
        "syscall {} args={:x?} -> {}",
        request.number, request.args, result
    );
    result
}
