//! Thin wrappers over the kernel's syscall ABI: number in `a7`, arguments
//! in `a0..a5`, result in `a0`.

use types::Syscall;

#[cfg(target_arch = "riscv64")]
#[inline(always)]
pub fn syscall(call: Syscall, args: [usize; 6]) -> isize {
    let ret: isize;
    unsafe {
        core::arch::asm!(
            "ecall",
            inlateout("a0") args[0] => ret,
            in("a1") args[1],
            in("a2") args[2],
            in("a3") args[3],
            in("a4") args[4],
            in("a5") args[5],
            in("a7") call.number(),
            options(nostack),
        );
    }
    ret
}

/// Off-target there is no kernel to ask.
#[cfg(not(target_arch = "riscv64"))]
pub fn syscall(_call: Syscall, _args: [usize; 6]) -> isize {
    types::syscall::SYSCALL_ERROR
}

pub fn write(fd: usize, buf: &[u8]) -> isize {
    syscall(Syscall::Write, [fd, buf.as_ptr() as usize, buf.len(), 0, 0, 0])
}

/// Report `code` to the kernel. The kernel keeps running us afterwards, so
/// spin until the next interrupt takes over.
pub fn exit(code: i32) -> ! {
    syscall(Syscall::Exit, [code as isize as usize, 0, 0, 0, 0, 0]);
    loop {
        core::hint::spin_loop();
    }
}

pub fn getpid() -> isize {
    syscall(Syscall::Getpid, [0; 6])
}

pub fn sleep(ms: u64) -> isize {
    syscall(Syscall::Sleep, [ms as usize, 0, 0, 0, 0, 0])
}

pub fn yield_now() -> isize {
    syscall(Syscall::Yield, [0; 6])
}

/// Milliseconds since boot.
pub fn time() -> isize {
    syscall(Syscall::Time, [0; 6])
}

pub fn exec(path: &str) -> isize {
    syscall(Syscall::Exec, [path.as_ptr() as usize, path.len(), 0, 0, 0, 0])
}

pub fn fork() -> isize {
    syscall(Syscall::Fork, [0; 6])
}

pub fn wait(status: &mut i32) -> isize {
    syscall(Syscall::Wait, [status as *mut i32 as usize, 0, 0, 0, 0, 0])
}

pub fn open(path: &str, flags: usize) -> isize {
    syscall(Syscall::Open, [path.as_ptr() as usize, path.len(), flags, 0, 0, 0])
}

pub fn close(fd: usize) -> isize {
    syscall(Syscall::Close, [fd, 0, 0, 0, 0, 0])
}

pub fn read(fd: usize, buf: &mut [u8]) -> isize {
    syscall(Syscall::Read, [fd, buf.as_mut_ptr() as usize, buf.len(), 0, 0, 0])
}
