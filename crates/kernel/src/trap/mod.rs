//! Supervisor trap dispatch.
//!
//! Every interrupt and exception taken while user code runs ends up in
//! [`TrapDispatcher::dispatch`], which classifies `scause`, runs the matching
//! handler and tells the entry stub whether to `sret` or park the hart.

use log::{error, info, warn};
use loader::PhysRegion;
use thiserror::Error;
use types::Register;
use types::registers::REGISTER_COUNT;

use crate::console::{Console, OutputSink};
use crate::csr::{Csr, Interrupts, Privilege, PrivilegedRegisters};
use crate::syscall::{self, SyscallContext, SyscallRequest};
use crate::timer::TimerService;

mod cause;
mod context;

pub use cause::{Exception, Interrupt, Trap, TrapCause};
pub use context::{INSTRUCTION_SIZE, TrapContext};

/// What the entry stub does once the dispatcher returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrapOutcome {
    Resume,
    Halt(FatalTrap),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum FatalTrap {
    #[error("{cause:?} at sepc={sepc:#x} stval={stval:#x} satp={satp:#x}")]
    PageFault {
        cause: Exception,
        sepc: usize,
        stval: usize,
        satp: usize,
    },
    #[error("unhandled {cause:?} (scause={scause:#x}) at sepc={sepc:#x} stval={stval:#x}")]
    Unhandled {
        cause: Exception,
        scause: usize,
        sepc: usize,
        stval: usize,
    },
    #[error("control returned from user mode")]
    ReturnedFromUser,
}

/// Cause registers sampled once per trap.
#[derive(Clone, Copy, Debug)]
struct TrapInfo {
    scause: usize,
    stval: usize,
}

pub struct TrapDispatcher<'m, R, S> {
    regs: R,
    timer: TimerService,
    console: Console<S>,
    /// User memory; syscall buffers and faulting instructions are read here.
    memory: PhysRegion<'m>,
}

impl<'m, R, S> TrapDispatcher<'m, R, S>
where
    R: PrivilegedRegisters,
    S: OutputSink,
{
    pub fn new(regs: R, timer: TimerService, sink: S, memory: PhysRegion<'m>) -> Self {
        Self {
            regs,
            timer,
            console: Console::new(sink),
            memory,
        }
    }

    pub fn regs(&self) -> &R {
        &self.regs
    }

    pub fn regs_mut(&mut self) -> &mut R {
        &mut self.regs
    }

    pub fn timer(&self) -> &TimerService {
        &self.timer
    }

    pub fn console(&self) -> &Console<S> {
        &self.console
    }

    pub fn memory(&self) -> &PhysRegion<'m> {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut PhysRegion<'m> {
        &mut self.memory
    }

    /// Arm the periodic timer.
    pub fn start_timer(&mut self) {
        self.timer.init(&mut self.regs);
    }

    /// Handle one trap. `ctx` is only modified on the `Resume` path, and
    /// then only `sepc` and `a0`.
    pub fn dispatch(&mut self, ctx: &mut TrapContext) -> TrapOutcome {
        let raw = TrapInfo {
            scause: self.regs.read(Csr::Scause),
            stval: self.regs.read(Csr::Stval),
        };
        let cause = TrapCause::from_raw(raw.scause);
        info!(
            target: "trap",
            "{:?} from {:?} sepc={:#x} stval={:#x}",
            cause,
            Privilege::previous(self.regs.read(Csr::Sstatus)),
            ctx.sepc,
            raw.stval
        );

        match cause {
            Trap::Interrupt(interrupt) => {
                self.handle_interrupt(interrupt);
                TrapOutcome::Resume
            }
            Trap::Exception(exception) => self.handle_exception(exception, raw, ctx),
        }
    }

    fn handle_interrupt(&mut self, interrupt: Interrupt) {
        match interrupt {
            Interrupt::SupervisorSoft => {
                self.regs.clear_bits(Csr::Sip, Interrupts::SOFTWARE.bits());
            }
            Interrupt::SupervisorTimer => self.timer.tick(&mut self.regs),
            Interrupt::SupervisorExternal => {
                self.regs.clear_bits(Csr::Sip, Interrupts::EXTERNAL.bits());
            }
            Interrupt::Unknown(code) => {
                warn!(target: "trap", "ignoring unknown interrupt {code}");
            }
        }
    }

    fn handle_exception(
        &mut self,
        exception: Exception,
        raw: TrapInfo,
        ctx: &mut TrapContext,
    ) -> TrapOutcome {
        match exception {
            Exception::InstructionMisaligned | Exception::InstructionFault => {
                warn!(
                    target: "trap",
                    "{exception:?} at {:#x} (stval={:#x}), skipping instruction",
                    ctx.sepc, raw.stval
                );
                ctx.advance_pc();
                TrapOutcome::Resume
            }
            Exception::IllegalInstruction => {
                let word = self
                    .memory
                    .read_u32(ctx.sepc as u64)
                    .unwrap_or(raw.stval as u32);
                warn!(
                    target: "trap",
                    "illegal instruction {word:#010x} at {:#x}, skipping",
                    ctx.sepc
                );
                ctx.advance_pc();
                TrapOutcome::Resume
            }
            Exception::UserEnvCall => {
                let request = SyscallRequest::from(&*ctx);
                let result = syscall::route(request, &self.syscall_context());
                ctx.set_return_value(result);
                ctx.advance_pc();
                TrapOutcome::Resume
            }
            cause if cause.is_page_fault() => {
                let fatal = FatalTrap::PageFault {
                    cause,
                    sepc: ctx.sepc,
                    stval: raw.stval,
                    satp: self.regs.read(Csr::Satp),
                };
                error!(target: "trap", "{fatal}");
                TrapOutcome::Halt(fatal)
            }
            cause => {
                let fatal = FatalTrap::Unhandled {
                    cause,
                    scause: raw.scause,
                    sepc: ctx.sepc,
                    stval: raw.stval,
                };
                error!(target: "trap", "{fatal}");
                dump_registers(ctx);
                TrapOutcome::Halt(fatal)
            }
        }
    }

    fn syscall_context(&self) -> SyscallContext<'_> {
        SyscallContext {
            console: &self.console,
            regs: &self.regs,
            timer: &self.timer,
            memory: &self.memory,
        }
    }
}

pub fn dump_registers(ctx: &TrapContext) {
    for row in (0..REGISTER_COUNT).step_by(4) {
        error!(
            target: "trap",
            "{:>4}={:#018x} {:>4}={:#018x} {:>4}={:#018x} {:>4}={:#018x}",
            Register::name_of(row),
            ctx.regs[row],
            Register::name_of(row + 1),
            ctx.regs[row + 1],
            Register::name_of(row + 2),
            ctx.regs[row + 2],
            Register::name_of(row + 3),
            ctx.regs[row + 3],
        );
    }
    error!(target: "trap", "sepc={:#x}", ctx.sepc);
}
