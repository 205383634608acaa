mod common;

use common::{FakeRegisters, RecordingSink, USER_BASE, USER_LEN, disk_with, user_image};
use kernel::csr::Csr;
use kernel::{Config, Kernel, TrapContext, TrapOutcome, TrapVector};
use loader::{LoadError, MemoryDisk, PhysRegion};
use types::Register;
use types::boot::USER_SECTOR;

const VECTOR: TrapVector = TrapVector {
    entry: 0x8020_1000,
    stack_top: 0x8030_0000,
};

fn kernel(ram: &mut [u8]) -> Kernel<'_, FakeRegisters, RecordingSink> {
    let mut regs = FakeRegisters::new();
    regs.set(Csr::Time, 42);
    Kernel::new(
        Config::default(),
        regs,
        RecordingSink::default(),
        PhysRegion::new(USER_BASE, ram),
    )
}

#[test]
fn boot_installs_vector_arms_timer_and_loads_user() {
    let text = [0x93, 0x08, 0x30, 0x00, 0x73, 0x00, 0x00, 0x00];
    let image = user_image(USER_BASE as u64, &text, 8);
    let disk = disk_with(USER_SECTOR, &image);
    let mut ram = vec![0xffu8; USER_LEN];

    let transition = {
        let mut kernel = kernel(&mut ram);
        let transition = kernel.boot(&MemoryDisk::new(&disk), VECTOR).unwrap();

        let regs = kernel.dispatcher().regs();
        assert_eq!(regs.get(Csr::Stvec), VECTOR.entry);
        assert_eq!(regs.get(Csr::Sscratch), VECTOR.stack_top);
        assert_eq!(regs.writes_to(Csr::Stimecmp), vec![100_042]);
        transition
    };

    assert_eq!(transition.entry(), USER_BASE);
    assert_eq!(transition.stack_top(), 0x8080_0000);
    assert_eq!(&ram[..8], &text);
    assert_eq!(&ram[8..16], &[0; 8]);
    assert!(ram[16..].iter().all(|b| *b == 0xff));
}

#[test]
fn boot_with_corrupt_user_image_loads_nothing() {
    let mut image = user_image(USER_BASE as u64, &[1, 2, 3, 4], 0);
    image[..4].copy_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
    let disk = disk_with(USER_SECTOR, &image);
    let mut ram = vec![0u8; USER_LEN];

    let err = kernel(&mut ram)
        .boot(&MemoryDisk::new(&disk), VECTOR)
        .unwrap_err();

    assert_eq!(err, LoadError::InvalidMagic { found: 0xefbe_adde });
    assert!(ram.iter().all(|b| *b == 0));
}

#[test]
fn boot_with_empty_disk_reports_truncation() {
    let disk = vec![0u8; 1024];
    let mut ram = vec![0u8; USER_LEN];

    let err = kernel(&mut ram)
        .boot(&MemoryDisk::new(&disk), VECTOR)
        .unwrap_err();
    assert_eq!(err, LoadError::TruncatedHeader);
}

#[test]
fn traps_after_boot_go_through_the_dispatcher() {
    let message = b"hi\n";
    let image = user_image(USER_BASE as u64, message, 0);
    let disk = disk_with(USER_SECTOR, &image);
    let mut ram = vec![0u8; USER_LEN];
    let mut kernel = kernel(&mut ram);
    kernel.boot(&MemoryDisk::new(&disk), VECTOR).unwrap();

    kernel.dispatcher_mut().regs_mut().set(Csr::Scause, 8);
    let mut ctx = TrapContext::new(USER_BASE + 0x200);
    ctx.set_reg(Register::A7, 1);
    ctx.set_reg(Register::A0, 1);
    ctx.set_reg(Register::A1, USER_BASE);
    ctx.set_reg(Register::A2, message.len());

    assert_eq!(kernel.handle_trap(&mut ctx), TrapOutcome::Resume);
    assert_eq!(ctx.reg(Register::A0), 3);
    assert_eq!(kernel.dispatcher().console().sink().output(), b"hi\r\n");
}
