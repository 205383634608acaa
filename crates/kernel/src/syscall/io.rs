use log::{info, warn};
use types::Syscall;
use types::syscall::{STDOUT, SYSCALL_ERROR};

use super::SyscallContext;

pub(super) fn sys_write(ctx: &SyscallContext<'_>, args: &[usize; 6]) -> isize {
    let [fd, buf, len, ..] = *args;
    if fd != STDOUT {
        info!(target: "syscall", "write: unsupported fd {fd}");
        return SYSCALL_ERROR;
    }
    if len == 0 {
        return 0;
    }
    let Ok(len_signed) = isize::try_from(len) else {
        return SYSCALL_ERROR;
    };
    match ctx.memory.slice(buf as u64, len as u64) {
        Ok(bytes) => {
            for &byte in bytes {
                ctx.console.put(byte);
            }
            len_signed
        }
        Err(err) => {
            warn!(target: "syscall", "write: bad user buffer: {err}");
            SYSCALL_ERROR
        }
    }
}

pub(super) fn sys_open(_ctx: &SyscallContext<'_>, args: &[usize; 6]) -> isize {
    unsupported(Syscall::Open, args)
}

pub(super) fn sys_close(_ctx: &SyscallContext<'_>, args: &[usize; 6]) -> isize {
    unsupported(Syscall::Close, args)
}

pub(super) fn sys_read(_ctx: &SyscallContext<'_>, args: &[usize; 6]) -> isize {
    unsupported(Syscall::Read, args)
}

/// No filesystem or process table exists; these all fail the same way.
pub(super) fn unsupported(syscall: Syscall, args: &[usize; 6]) -> isize {
    info!(
        target: "syscall",
        "{}({:#x}, {:#x}, {:#x}): not supported",
        syscall.name(),
        args[0],
        args[1],
        args[2]
    );
    SYSCALL_ERROR
}
