#![no_std]
#![no_main]

use core::arch::global_asm;
use core::panic::PanicInfo;

use bootloader::arch::{enter_supervisor, park, read_misa};
use bootloader::{BootConfig, Bootloader, Isa};
use kernel::Uart16550;
use kernel::logger::{self, ConsoleLogger};
use loader::{MemoryDisk, PhysRegion};
use log::{error, info};
use types::boot::{DISK_BASE, DISK_WINDOW_BYTES, UART0_BASE};

const CONFIG: BootConfig = BootConfig::QEMU_VIRT;

// SAFETY: UART0 of the QEMU virt machine; nothing else drives it during boot.
const UART: Uart16550 = unsafe { Uart16550::new(UART0_BASE) };
static LOGGER: ConsoleLogger<Uart16550> = ConsoleLogger::new(UART);

global_asm!(
    r#"
    .section .text.entry, "ax"
    .globl _start
_start:
    csrr t0, mhartid
    bnez t0, 2f
    la sp, __stack_top
    call bmain
2:
    wfi
    j 2b
"#
);

#[unsafe(no_mangle)]
extern "C" fn bmain() -> ! {
    UART.init();
    if logger::init(&LOGGER, CONFIG.log_level).is_err() {
        LOGGER.console().write_bytes(b"logger already installed\n");
    }
    info!(target: "boot", "rvboot stage 0");

    let bootloader = Bootloader::new(CONFIG);
    if let Err(err) = bootloader.check_isa(Isa::from_misa(read_misa())) {
        error!(target: "boot", "{err}");
        park()
    }

    // SAFETY: QEMU preloads the disk image at DISK_BASE and nothing else
    // lives in the kernel region yet.
    let (disk, mut memory) = unsafe {
        (
            MemoryDisk::from_raw(DISK_BASE, DISK_WINDOW_BYTES),
            PhysRegion::from_raw(CONFIG.kernel_region.base, CONFIG.kernel_region.size),
        )
    };
    match bootloader.load_kernel(&disk, &mut memory) {
        Ok(handoff) => {
            info!(target: "boot", "jumping to kernel at {:#x}", handoff.entry());
            // SAFETY: the entry point comes from the image just loaded.
            unsafe { enter_supervisor(handoff.entry()) };
            error!(target: "boot", "kernel returned!");
        }
        Err(err) => error!(target: "boot", "boot failed: {err}"),
    }
    park()
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    error!(target: "boot", "bootloader panic: {info}");
    park()
}
