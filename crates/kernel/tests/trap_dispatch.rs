mod common;

use common::{FakeRegisters, USER_BASE, USER_LEN, dispatcher};
use kernel::csr::{Csr, Interrupts};
use kernel::trap::{Exception, TrapCause};
use kernel::{FatalTrap, TrapContext, TrapOutcome};
use proptest::prelude::*;
use types::Register;

fn ecall(number: usize, args: &[usize]) -> TrapContext {
    let mut ctx = TrapContext::new(USER_BASE + 0x100);
    ctx.set_reg(Register::A7, number);
    for (reg, value) in [Register::A0, Register::A1, Register::A2].iter().zip(args) {
        ctx.set_reg(*reg, *value);
    }
    ctx
}

#[test]
fn ecall_routes_write_and_steps_past_instruction() {
    let mut ram = vec![0u8; USER_LEN];
    ram[..2].copy_from_slice(b"AB");
    let mut dispatcher = dispatcher(&mut ram);
    dispatcher.regs_mut().set(Csr::Scause, 8);

    let mut ctx = ecall(1, &[1, USER_BASE, 2]);
    assert_eq!(dispatcher.dispatch(&mut ctx), TrapOutcome::Resume);

    assert_eq!(ctx.sepc, USER_BASE + 0x104);
    assert_eq!(ctx.reg(Register::A0), 2);
    assert_eq!(dispatcher.console().sink().output(), b"AB");
}

#[test]
fn ecall_result_is_written_to_a0_as_signed() {
    let mut ram = vec![0u8; USER_LEN];
    let mut dispatcher = dispatcher(&mut ram);
    dispatcher.regs_mut().set(Csr::Scause, 8);

    let mut ctx = ecall(99, &[]);
    dispatcher.dispatch(&mut ctx);
    assert_eq!(ctx.reg(Register::A0) as isize, -1);

    let mut ctx = ecall(3, &[]);
    dispatcher.dispatch(&mut ctx);
    assert_eq!(ctx.reg(Register::A0), 1);
}

#[test]
fn software_and_external_interrupts_clear_their_pending_bit() {
    let mut ram = vec![0u8; USER_LEN];
    let mut dispatcher = dispatcher(&mut ram);
    let pending = Interrupts::SOFTWARE | Interrupts::EXTERNAL | Interrupts::TIMER;
    dispatcher.regs_mut().set(Csr::Sip, pending.bits());

    let mut ctx = TrapContext::new(USER_BASE);
    dispatcher
        .regs_mut()
        .set(Csr::Scause, TrapCause::interrupt_bits(1));
    assert_eq!(dispatcher.dispatch(&mut ctx), TrapOutcome::Resume);
    assert_eq!(
        dispatcher.regs().get(Csr::Sip),
        (Interrupts::EXTERNAL | Interrupts::TIMER).bits()
    );

    dispatcher
        .regs_mut()
        .set(Csr::Scause, TrapCause::interrupt_bits(9));
    assert_eq!(dispatcher.dispatch(&mut ctx), TrapOutcome::Resume);
    assert_eq!(dispatcher.regs().get(Csr::Sip), Interrupts::TIMER.bits());
    assert_eq!(ctx.sepc, USER_BASE);
}

#[test]
fn timer_interrupt_ticks_and_rearms() {
    let mut ram = vec![0u8; USER_LEN];
    let mut dispatcher = dispatcher(&mut ram);
    dispatcher.regs_mut().set(Csr::Time, 1_000);
    dispatcher
        .regs_mut()
        .set(Csr::Scause, TrapCause::interrupt_bits(5));

    let mut ctx = TrapContext::new(USER_BASE + 8);
    let before = ctx;
    assert_eq!(dispatcher.dispatch(&mut ctx), TrapOutcome::Resume);

    assert_eq!(dispatcher.timer().ticks(), 1);
    assert_eq!(dispatcher.regs().writes_to(Csr::Stimecmp), vec![101_000]);
    assert_eq!(ctx.regs, before.regs);
    assert_eq!(ctx.sepc, before.sepc);
}

#[test]
fn unknown_interrupt_is_ignored() {
    let mut ram = vec![0u8; USER_LEN];
    let mut dispatcher = dispatcher(&mut ram);
    dispatcher
        .regs_mut()
        .set(Csr::Scause, TrapCause::interrupt_bits(13));

    let mut ctx = TrapContext::new(USER_BASE);
    assert_eq!(dispatcher.dispatch(&mut ctx), TrapOutcome::Resume);
    assert_eq!(ctx.sepc, USER_BASE);
    assert!(dispatcher.regs().writes.is_empty());
}

#[test]
fn illegal_instruction_outside_user_memory_still_advances() {
    let mut ram = vec![0u8; USER_LEN];
    let mut dispatcher = dispatcher(&mut ram);
    dispatcher.regs_mut().set(Csr::Scause, 2);
    dispatcher.regs_mut().set(Csr::Stval, 0xffff_ffff);

    let mut ctx = TrapContext::new(0x8000_0000);
    assert_eq!(dispatcher.dispatch(&mut ctx), TrapOutcome::Resume);
    assert_eq!(ctx.sepc, 0x8000_0004);
    assert_eq!((ctx.cause, ctx.tval), (0, 0));
}

#[test]
fn page_fault_halts_with_satp() {
    let mut ram = vec![0u8; USER_LEN];
    let mut dispatcher = dispatcher(&mut ram);
    dispatcher.regs_mut().set(Csr::Scause, 13);
    dispatcher.regs_mut().set(Csr::Stval, 0xdead_0000);
    dispatcher.regs_mut().set(Csr::Satp, 0x8000_0000_0008_0400);

    let mut ctx = TrapContext::new(USER_BASE + 0x40);
    assert_eq!(
        dispatcher.dispatch(&mut ctx),
        TrapOutcome::Halt(FatalTrap::PageFault {
            cause: Exception::LoadPageFault,
            sepc: USER_BASE + 0x40,
            stval: 0xdead_0000,
            satp: 0x8000_0000_0008_0400,
        })
    );
    assert_eq!(ctx, TrapContext::new(USER_BASE + 0x40));
}

#[test]
fn breakpoint_is_fatal() {
    let mut ram = vec![0u8; USER_LEN];
    let mut dispatcher = dispatcher(&mut ram);
    dispatcher.regs_mut().set(Csr::Scause, 3);

    let mut ctx = TrapContext::new(USER_BASE);
    let outcome = dispatcher.dispatch(&mut ctx);
    assert!(matches!(
        outcome,
        TrapOutcome::Halt(FatalTrap::Unhandled {
            cause: Exception::Breakpoint,
            scause: 3,
            ..
        })
    ));
}

#[test]
fn cause_decoding_uses_low_byte() {
    assert_eq!(
        TrapCause::from_raw(0x108),
        kernel::trap::Trap::Exception(Exception::UserEnvCall)
    );
    assert_eq!(
        TrapCause::from_raw(TrapCause::interrupt_bits(5)),
        kernel::trap::Trap::Interrupt(kernel::trap::Interrupt::SupervisorTimer)
    );
    assert_eq!(
        TrapCause::from_raw(16),
        kernel::trap::Trap::Exception(Exception::Other(16))
    );
}

/// Syscalls that return without spinning on the clock.
const QUICK_SYSCALLS: [usize; 11] = [1, 2, 3, 5, 6, 7, 8, 9, 10, 11, 12];

fn context_strategy() -> impl Strategy<Value = TrapContext> {
    (prop::array::uniform32(any::<usize>()), 0usize..(1 << 40)).prop_map(|(regs, sepc)| {
        let mut ctx = TrapContext::new(sepc & !3);
        ctx.regs = regs;
        ctx
    })
}

proptest! {
    #[test]
    fn recoverable_exceptions_advance_pc_by_four(
        ctx in context_strategy(),
        code in prop::sample::select(vec![0usize, 1, 2, 8]),
        syscall in prop::sample::select(QUICK_SYSCALLS.to_vec()),
    ) {
        let mut ctx = ctx;
        let mut ram = vec![0u8; USER_LEN];
        let mut dispatcher = dispatcher(&mut ram);
        dispatcher.regs_mut().set(Csr::Scause, code);
        ctx.set_reg(Register::A7, syscall);
        let before = ctx;

        prop_assert_eq!(dispatcher.dispatch(&mut ctx), TrapOutcome::Resume);
        prop_assert_eq!(ctx.sepc, before.sepc + 4);
        prop_assert_eq!((ctx.cause, ctx.tval), (before.cause, before.tval));
        for index in 0..32 {
            if code != 8 || index != Register::A0.index() {
                prop_assert_eq!(ctx.regs[index], before.regs[index]);
            }
        }
    }

    #[test]
    fn fatal_exceptions_leave_context_untouched(
        ctx in context_strategy(),
        code in prop::sample::select(vec![3usize, 4, 5, 6, 7, 9, 11, 12, 13, 15, 16, 24, 0xff]),
        stval in any::<usize>(),
    ) {
        let mut ram = vec![0u8; USER_LEN];
        let mut dispatcher = dispatcher(&mut ram);
        dispatcher.regs_mut().set(Csr::Scause, code);
        dispatcher.regs_mut().set(Csr::Stval, stval);
        let mut after = ctx;

        let outcome = dispatcher.dispatch(&mut after);
        prop_assert!(matches!(outcome, TrapOutcome::Halt(_)));
        prop_assert_eq!(after, ctx);
        prop_assert!(dispatcher.regs().writes.is_empty());
    }
}

#[test]
fn fake_time_advances_per_read() {
    use kernel::PrivilegedRegisters;
    let regs = FakeRegisters::with_time_step(3);
    assert_eq!(regs.read(Csr::Time), 0);
    assert_eq!(regs.read(Csr::Time), 3);
}
