use log::info;
use types::Syscall;

use super::SyscallContext;
use super::io::unsupported;

/// The single user program always runs as pid 1.
pub const USER_PID: isize = 1;

pub(super) fn sys_exit(_ctx: &SyscallContext<'_>, args: &[usize; 6]) -> isize {
    info!(target: "syscall", "user program exited with code {}", args[0] as isize);
    0
}

pub(super) fn sys_getpid(_ctx: &SyscallContext<'_>, _args: &[usize; 6]) -> isize {
    USER_PID
}

pub(super) fn sys_exec(_ctx: &SyscallContext<'_>, args: &[usize; 6]) -> isize {
    unsupported(Syscall::Exec, args)
}

pub(super) fn sys_fork(_ctx: &SyscallContext<'_>, args: &[usize; 6]) -> isize {
    unsupported(Syscall::Fork, args)
}

pub(super) fn sys_wait(_ctx: &SyscallContext<'_>, args: &[usize; 6]) -> isize {
    unsupported(Syscall::Wait, args)
}
