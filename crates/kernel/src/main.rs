#![no_std]
#![no_main]

use core::arch::global_asm;
use core::panic::PanicInfo;

use kernel::arch::{self, RiscvRegisters, SretSwitch};
use kernel::global::KernelCell;
use kernel::logger::{self, ConsoleLogger};
use kernel::{Config, Kernel, TrapContext, TrapOutcome, TrapVector, Uart16550};
use loader::{MemoryDisk, PhysRegion};
use log::error;
use types::boot::{DISK_BASE, DISK_WINDOW_BYTES};

type KernelState = Kernel<'static, RiscvRegisters, Uart16550>;

const CONFIG: Config = Config::QEMU_VIRT;

// SAFETY: UART0 of the QEMU virt machine; only this driver writes it.
const UART: Uart16550 = unsafe { Uart16550::new(CONFIG.uart_base) };
static LOGGER: ConsoleLogger<Uart16550> = ConsoleLogger::new(UART);
static KERNEL: KernelCell<Option<KernelState>> = KernelCell::new(None);

unsafe extern "C" {
    static __trap_stack_top: u8;
}

global_asm!(
    r#"
    .section .text.entry, "ax"
    .globl _start
_start:
    la sp, __boot_stack_top
    la t0, __bss_start
    la t1, __bss_end
2:
    bgeu t0, t1, 3f
    sd zero, 0(t0)
    addi t0, t0, 8
    j 2b
3:
    call kmain
1:
    wfi
    j 1b
"#
);

#[unsafe(no_mangle)]
extern "C" fn kmain() -> ! {
    UART.init();
    if logger::init(&LOGGER, CONFIG.log_level).is_err() {
        LOGGER.console().write_bytes(b"logger already installed\n");
    }

    // SAFETY: the bootloader left the user region unused and the preloaded
    // disk image in place; neither is referenced anywhere else.
    let (memory, disk) = unsafe {
        (
            PhysRegion::from_raw(CONFIG.user_region.base, CONFIG.user_region.size),
            MemoryDisk::from_raw(DISK_BASE, DISK_WINDOW_BYTES),
        )
    };
    let vector = TrapVector {
        entry: arch::trap_entry_address(),
        stack_top: unsafe { &raw const __trap_stack_top } as usize,
    };

    // SAFETY: no trap can arrive before user mode is entered, so this is the
    // only live reference until the borrow ends.
    let booted = unsafe {
        let slot = KERNEL.get_mut();
        let kernel = slot.insert(Kernel::new(CONFIG, RiscvRegisters, UART, memory));
        kernel.boot(&disk, vector)
    };

    match booted {
        Ok(transition) => {
            let fatal = transition.enter(&mut RiscvRegisters, &mut SretSwitch);
            error!(target: "boot", "{fatal}");
            arch::halt()
        }
        Err(err) => {
            error!(target: "boot", "failed to load user program: {err}");
            arch::idle()
        }
    }
}

/// Called by the trap entry stub with the saved user context.
#[unsafe(no_mangle)]
extern "C" fn handle_trap(ctx: &mut TrapContext) {
    // SAFETY: traps do not nest and boot code no longer holds the kernel.
    let Some(kernel) = (unsafe { KERNEL.get_mut() }) else {
        error!(target: "trap", "trap before kernel initialisation: {ctx:?}");
        arch::halt()
    };
    if let TrapOutcome::Halt(fatal) = kernel.handle_trap(ctx) {
        error!(target: "trap", "halting: {fatal}");
        arch::halt()
    }
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    error!(target: "boot", "kernel panic: {info}");
    arch::halt()
}
