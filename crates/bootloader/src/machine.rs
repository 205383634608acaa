//! M-mode register values programmed before entering the kernel.

/// Environment call from S-mode.
const ECALL_FROM_S: usize = 9;
/// Environment call from M-mode.
const ECALL_FROM_M: usize = 11;

/// Every exception below 16 except ecalls that must stay in M-mode.
pub const MEDELEG: usize = 0xffff & !((1 << ECALL_FROM_S) | (1 << ECALL_FROM_M));
/// Supervisor software, timer and external interrupts.
pub const MIDELEG: usize = (1 << 1) | (1 << 5) | (1 << 9);

/// `mstatus.MPP` field and its S-mode encoding.
pub const MSTATUS_MPP_MASK: usize = 0b11 << 11;
pub const MSTATUS_MPP_S: usize = 0b01 << 11;

/// `menvcfg.STCE`: lets S-mode use `stimecmp`.
pub const MENVCFG_STCE: usize = 1 << 63;
/// `mcounteren.TM`: lets S-mode read `time`.
pub const MCOUNTEREN_TM: usize = 1 << 1;

/// PMP entry 0 as TOR over the whole address space, RWX.
pub const PMPADDR0_ALL: usize = usize::MAX >> 10;
pub const PMPCFG0_TOR_RWX: usize = 0b0000_1111;

/// `mstatus` after selecting S-mode as the `mret` target.
pub const fn mstatus_for_supervisor(mstatus: usize) -> usize {
    (mstatus & !MSTATUS_MPP_MASK) | MSTATUS_MPP_S
}
