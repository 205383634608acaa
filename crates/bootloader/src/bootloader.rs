use log::{LevelFilter, error, info};
use loader::elf::ELF_MAGIC;
use loader::{BlockSource, LoadError, PhysRegion, load, sector_offset};
use thiserror::Error;
use types::Region;
use types::boot::{KERNEL_REGION, KERNEL_SECTOR};

use crate::isa::Isa;

/// Bytes of the kernel image echoed to the console before loading.
pub const PEEK_LEN: usize = 16;

/// Boot configuration options consumed by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootConfig {
    /// Echo the head of the kernel image and the ISA string while booting.
    pub debug_console: bool,
    pub kernel_sector: u64,
    pub kernel_region: Region,
    pub log_level: LevelFilter,
}

impl BootConfig {
    pub const QEMU_VIRT: BootConfig = BootConfig {
        debug_console: true,
        kernel_sector: KERNEL_SECTOR,
        kernel_region: KERNEL_REGION,
        log_level: LevelFilter::Info,
    };
}

impl Default for BootConfig {
    fn default() -> Self {
        Self::QEMU_VIRT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BootError {
    #[error("hart lacks supervisor and user modes: {0}")]
    MissingPrivilegeModes(Isa),
    #[error("kernel image: {0}")]
    Load(#[from] LoadError),
}

/// Where to jump once the kernel is in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelHandoff {
    entry: usize,
    segments: usize,
}

impl KernelHandoff {
    pub fn entry(&self) -> usize {
        self.entry
    }

    pub fn segments(&self) -> usize {
        self.segments
    }
}

#[derive(Debug, Default)]
pub struct Bootloader {
    pub config: BootConfig,
}

impl Bootloader {
    pub fn new(config: BootConfig) -> Self {
        Self { config }
    }

    /// The kernel needs S-mode to run and U-mode to drop into.
    pub fn check_isa(&self, isa: Isa) -> Result<(), BootError> {
        if self.config.debug_console {
            info!(target: "boot", "isa: {isa}");
        }
        if !isa.has_supervisor() || !isa.has_user() {
            return Err(BootError::MissingPrivilegeModes(isa));
        }
        Ok(())
    }

    /// Load the kernel image into `memory`, which must cover the kernel region.
    pub fn load_kernel<D: BlockSource + ?Sized>(
        &self,
        disk: &D,
        memory: &mut PhysRegion<'_>,
    ) -> Result<KernelHandoff, BootError> {
        let offset = sector_offset(self.config.kernel_sector);
        info!(
            target: "boot",
            "loading kernel from sector {} (offset {offset:#x}) into {:#x}..{:#x}",
            self.config.kernel_sector,
            memory.base(),
            memory.end()
        );
        if self.config.debug_console {
            self.peek(disk, offset);
        }

        let image = load(disk, offset, memory).inspect_err(|err| {
            error!(target: "boot", "kernel load failed: {err}");
        })?;
        info!(target: "boot", "kernel entry {:#x}", image.entry());
        Ok(KernelHandoff {
            entry: image.entry() as usize,
            segments: image.segments().len(),
        })
    }

    fn peek<D: BlockSource + ?Sized>(&self, disk: &D, offset: u64) {
        let mut head = [0u8; PEEK_LEN];
        if disk.read(&mut head, offset).is_err() {
            info!(target: "boot", "kernel sector unreadable");
            return;
        }
        info!(target: "boot", "kernel head: {}", HexBytes(&head));
        let found = u32::from_le_bytes([head[0], head[1], head[2], head[3]]);
        info!(
            target: "boot",
            "magic: found {found:#010x}, expected {ELF_MAGIC:#010x}"
        );
    }
}

/// Space-separated uppercase hex, e.g. `7F 45 4C 46`.
pub struct HexBytes<'a>(pub &'a [u8]);

impl core::fmt::Display for HexBytes<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}
