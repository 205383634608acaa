use super::SyscallContext;

/// Busy-wait until `ms` milliseconds have passed, yielding on every poll.
pub(super) fn sys_sleep(ctx: &SyscallContext<'_>, args: &[usize; 6]) -> isize {
    let ms = args[0] as u64;
    let start = ctx.timer.now_ms(ctx.regs);
    while ctx.timer.now_ms(ctx.regs).saturating_sub(start) < ms {
        sys_yield(ctx, &[0; 6]);
        core::hint::spin_loop();
    }
    0
}

pub(super) fn sys_yield(_ctx: &SyscallContext<'_>, _args: &[usize; 6]) -> isize {
    0
}

pub(super) fn sys_time(ctx: &SyscallContext<'_>, _args: &[usize; 6]) -> isize {
    ctx.timer.now_ms(ctx.regs) as isize
}
