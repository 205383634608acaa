//! Fixed deployment layout shared by the bootloader, the kernel and `mkdisk`.
//!
//! The bootloader runs as firmware from [`BOOTLOADER_BASE`]. The disk image
//! is preloaded by QEMU at [`DISK_BASE`]; everything on it is addressed in
//! 512-byte sectors. The layout is a convention, nothing on the disk
//! describes it.

/// Size of one storage sector in bytes.
pub const SECTOR_SIZE: usize = 512;

/// Sectors before the kernel are reserved and left zeroed.
pub const RESERVED_SECTORS: u64 = 4;
/// Sector holding the kernel ELF image.
pub const KERNEL_SECTOR: u64 = 4;
/// Sector holding the user ELF image.
pub const USER_SECTOR: u64 = 64;

/// Reset vector of the QEMU `virt` machine; the bootloader is linked here.
pub const BOOTLOADER_BASE: usize = 0x8000_0000;
/// Physical address the disk image is preloaded at.
pub const DISK_BASE: usize = 0x8400_0000;
/// Largest disk image the boot path will read from.
pub const DISK_WINDOW_BYTES: usize = 0x20_0000;

/// Physical memory the kernel image may be loaded into.
pub const KERNEL_REGION: Region = Region::new(0x8020_0000, 0x20_0000);
/// Physical memory the user image may be loaded into. The user stack grows
/// down from its end.
pub const USER_REGION: Region = Region::new(0x8040_0000, 0x40_0000);
/// Initial user stack pointer.
pub const USER_STACK_TOP: usize = USER_REGION.end();

/// 16550 UART on the QEMU `virt` machine.
pub const UART0_BASE: usize = 0x1000_0000;

/// Byte offset of `sector` on the storage medium.
pub const fn sector_offset(sector: u64) -> u64 {
    sector * SECTOR_SIZE as u64
}

/// A contiguous physical address range `[base, base + size)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub base: usize,
    pub size: usize,
}

impl Region {
    pub const fn new(base: usize, size: usize) -> Self {
        Self { base, size }
    }

    pub const fn end(&self) -> usize {
        self.base + self.size
    }

    /// Whether `[addr, addr + len)` lies entirely inside this region.
    pub const fn contains(&self, addr: usize, len: usize) -> bool {
        match addr.checked_add(len) {
            Some(end) => addr >= self.base && end <= self.end(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_layout_does_not_overlap() {
        assert!(BOOTLOADER_BASE < KERNEL_REGION.base);
        assert!(KERNEL_REGION.end() <= USER_REGION.base);
        assert!(USER_REGION.end() <= DISK_BASE);
        assert!(sector_offset(USER_SECTOR) < DISK_WINDOW_BYTES as u64);
    }

    #[test]
    fn region_contains_is_overflow_safe() {
        let region = Region::new(0x1000, 0x100);
        assert!(region.contains(0x1000, 0x100));
        assert!(region.contains(0x10ff, 1));
        assert!(!region.contains(0x10ff, 2));
        assert!(!region.contains(0xfff, 1));
        assert!(!region.contains(usize::MAX, 2));
    }
}
