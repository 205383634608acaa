mod common;

use common::{FakeRegisters, RecordingSink, USER_BASE, USER_LEN};
use kernel::csr::Csr;
use kernel::syscall::{SyscallContext, SyscallRequest, route};
use kernel::{Config, Console, TimerService};
use loader::PhysRegion;
use types::Syscall;

/// One millisecond of the 10 MHz QEMU clock.
const CYCLES_PER_MS: usize = 10_000;

struct Harness {
    ram: Vec<u8>,
    regs: FakeRegisters,
    timer: TimerService,
    console: Console<RecordingSink>,
}

impl Harness {
    fn new() -> Self {
        Self {
            ram: vec![0u8; USER_LEN],
            regs: FakeRegisters::new(),
            timer: TimerService::new(&Config::default()),
            console: Console::new(RecordingSink::default()),
        }
    }

    fn call(&mut self, number: usize, args: [usize; 6]) -> isize {
        let memory = PhysRegion::new(USER_BASE, &mut self.ram);
        let ctx = SyscallContext {
            console: &self.console,
            regs: &self.regs,
            timer: &self.timer,
            memory: &memory,
        };
        route(SyscallRequest::new(number, args), &ctx)
    }

    fn output(&self) -> Vec<u8> {
        self.console.sink().output()
    }
}

#[test]
fn write_to_stdout_emits_bytes_in_order() {
    let mut h = Harness::new();
    h.ram[0x20..0x22].copy_from_slice(b"AB");

    assert_eq!(h.call(1, [1, USER_BASE + 0x20, 2, 0, 0, 0]), 2);
    assert_eq!(h.output(), b"AB");
}

#[test]
fn write_translates_newlines_but_reports_requested_length() {
    let mut h = Harness::new();
    h.ram[..3].copy_from_slice(b"a\nb");

    assert_eq!(h.call(1, [1, USER_BASE, 3, 0, 0, 0]), 3);
    assert_eq!(h.output(), b"a\r\nb");
}

#[test]
fn write_rejects_other_descriptors_and_bad_buffers() {
    let mut h = Harness::new();
    h.ram[..2].copy_from_slice(b"AB");

    assert_eq!(h.call(1, [0, USER_BASE, 2, 0, 0, 0]), -1);
    assert_eq!(h.call(1, [2, USER_BASE, 2, 0, 0, 0]), -1);
    assert_eq!(h.call(1, [1, USER_BASE - 1, 2, 0, 0, 0]), -1);
    assert_eq!(h.call(1, [1, USER_BASE + USER_LEN - 1, 2, 0, 0, 0]), -1);
    assert_eq!(h.call(1, [1, USER_BASE, usize::MAX, 0, 0, 0]), -1);
    assert!(h.output().is_empty());
}

#[test]
fn empty_write_succeeds_without_output() {
    let mut h = Harness::new();
    assert_eq!(h.call(1, [1, 0, 0, 0, 0, 0]), 0);
    assert!(h.output().is_empty());
}

#[test]
fn unknown_numbers_return_minus_one() {
    let mut h = Harness::new();
    for number in [0, 13, 64, usize::MAX] {
        assert_eq!(h.call(number, [0; 6]), -1);
    }
}

#[test]
fn unimplemented_syscalls_fail_uniformly() {
    let mut h = Harness::new();
    for syscall in [
        Syscall::Exec,
        Syscall::Fork,
        Syscall::Wait,
        Syscall::Open,
        Syscall::Close,
        Syscall::Read,
    ] {
        assert_eq!(h.call(syscall.number(), [0; 6]), -1, "{}", syscall.name());
    }
}

#[test]
fn exit_and_yield_return_zero() {
    let mut h = Harness::new();
    assert_eq!(h.call(Syscall::Exit.number(), [42, 0, 0, 0, 0, 0]), 0);
    assert_eq!(h.call(Syscall::Yield.number(), [0; 6]), 0);
}

#[test]
fn getpid_is_stable() {
    let mut h = Harness::new();
    let first = h.call(Syscall::Getpid.number(), [0; 6]);
    assert_eq!(first, 1);
    assert_eq!(h.call(Syscall::Getpid.number(), [0; 6]), first);
}

#[test]
fn time_reports_milliseconds() {
    let mut h = Harness::new();
    h.regs.set(Csr::Time, 25_000_000);
    assert_eq!(h.call(Syscall::Time.number(), [0; 6]), 2_500);
}

#[test]
fn sleep_returns_only_after_the_requested_time() {
    let mut h = Harness {
        regs: FakeRegisters::with_time_step(CYCLES_PER_MS / 4),
        ..Harness::new()
    };
    h.regs.set(Csr::Time, 7 * CYCLES_PER_MS);

    assert_eq!(h.call(Syscall::Sleep.number(), [5, 0, 0, 0, 0, 0]), 0);

    let elapsed_ms = (h.regs.get(Csr::Time) - 7 * CYCLES_PER_MS) / CYCLES_PER_MS;
    assert!(elapsed_ms >= 5, "slept only {elapsed_ms} ms");
}

#[test]
fn zero_sleep_returns_immediately() {
    let mut h = Harness::new();
    assert_eq!(h.call(Syscall::Sleep.number(), [0; 6]), 0);
}

#[test]
fn request_is_built_from_a7_and_a0_to_a5() {
    use kernel::TrapContext;
    use types::Register;

    let mut ctx = TrapContext::new(0);
    ctx.set_reg(Register::A7, 6);
    for (i, reg) in [Register::A0, Register::A1, Register::A2, Register::A3, Register::A4, Register::A5]
        .into_iter()
        .enumerate()
    {
        ctx.set_reg(reg, i + 10);
    }
    ctx.set_reg(Register::A6, 99);

    let request = SyscallRequest::from(&ctx);
    assert_eq!(request, SyscallRequest::new(6, [10, 11, 12, 13, 14, 15]));
}
