use core::fmt;

use types::registers::{REGISTER_COUNT, RETURN_VALUE, SYSCALL_ARGS, SYSCALL_NUMBER};
use types::Register;

/// Width of every instruction the dispatcher steps over.
pub const INSTRUCTION_SIZE: usize = 4;

/// Register state saved by the trap entry stub.
///
/// The layout is shared with the assembly in `arch::riscv64::trap`:
/// 32 integer registers, then `sepc`, `scause`, `stval`.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TrapContext {
    pub regs: [usize; REGISTER_COUNT],
    pub sepc: usize,
    pub cause: usize,
    pub tval: usize,
}

impl TrapContext {
    pub const fn new(sepc: usize) -> Self {
        Self {
            regs: [0; REGISTER_COUNT],
            sepc,
            cause: 0,
            tval: 0,
        }
    }

    pub fn reg(&self, reg: Register) -> usize {
        self.regs[reg.index()]
    }

    pub fn set_reg(&mut self, reg: Register, value: usize) {
        self.regs[reg.index()] = value;
    }

    pub fn syscall_number(&self) -> usize {
        self.reg(SYSCALL_NUMBER)
    }

    pub fn syscall_args(&self) -> [usize; 6] {
        SYSCALL_ARGS.map(|reg| self.reg(reg))
    }

    /// Step past the trapping instruction.
    pub fn advance_pc(&mut self) {
        self.sepc = self.sepc.wrapping_add(INSTRUCTION_SIZE);
    }

    pub fn set_return_value(&mut self, value: isize) {
        self.set_reg(RETURN_VALUE, value as usize);
    }
}

impl fmt::Debug for TrapContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrapContext")
            .field("sepc", &format_args!("{:#x}", self.sepc))
            .field("cause", &format_args!("{:#x}", self.cause))
            .field("tval", &format_args!("{:#x}", self.tval))
            .finish_non_exhaustive()
    }
}
