use core::arch::{asm, global_asm};

use crate::privilege::ModeSwitch;

// Layout matches `TrapContext`: x0..x31 at 8*n, sepc at 256, scause at 264,
// stval at 272. sscratch holds the trap stack top while user code runs; the
// binary provides `handle_trap(&mut TrapContext)`.
global_asm!(
    r#"
    .section .text
    .globl __trap_entry
    .balign 4
__trap_entry:
    csrrw sp, sscratch, sp
    addi sp, sp, -288
    sd x1, 8(sp)
    .irp n, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31
    sd x\n, \n*8(sp)
    .endr
    csrr t0, sscratch
    sd t0, 16(sp)
    csrr t0, sepc
    sd t0, 256(sp)
    csrr t0, scause
    sd t0, 264(sp)
    csrr t0, stval
    sd t0, 272(sp)

    mv a0, sp
    call handle_trap

    ld t0, 256(sp)
    csrw sepc, t0
    ld x1, 8(sp)
    .irp n, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31
    ld x\n, \n*8(sp)
    .endr
    addi sp, sp, 288
    csrrw sp, sscratch, sp
    sret
"#
);

unsafe extern "C" {
    fn __trap_entry();
}

/// Value for `stvec` (direct mode).
pub fn trap_entry_address() -> usize {
    __trap_entry as usize
}

/// Drops to the mode selected by `sstatus.SPP` via `sret`.
#[derive(Debug, Default)]
pub struct SretSwitch;

impl ModeSwitch for SretSwitch {
    unsafe fn switch(&mut self, stack_top: usize) {
        unsafe { asm!("mv sp, {0}", "sret", in(reg) stack_top, options(noreturn)) }
    }
}
