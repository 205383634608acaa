use anyhow::{Result, ensure};
use serde::Serialize;
use types::boot::{DISK_WINDOW_BYTES, KERNEL_SECTOR, USER_SECTOR};
use types::{SECTOR_SIZE, sector_offset};

/// Where one component landed on the disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub name: String,
    pub sector: u64,
    pub offset: u64,
    pub size: usize,
    /// Bytes available before the next fixed component or the end of the
    /// readable window.
    pub capacity: usize,
}

impl Placement {
    pub fn sectors(&self) -> u64 {
        self.size.div_ceil(SECTOR_SIZE) as u64
    }
}

#[derive(Debug, Clone)]
pub struct DiskImage {
    pub bytes: Vec<u8>,
    pub placements: Vec<Placement>,
}

fn place(
    disk: &mut Vec<u8>,
    name: &str,
    sector: u64,
    next: u64,
    bytes: &[u8],
) -> Result<Placement> {
    let offset = sector_offset(sector);
    let capacity = (sector_offset(next) - offset) as usize;
    ensure!(
        bytes.len() <= capacity,
        "{name} is {} bytes but only {capacity} fit between sector {sector} and sector {next}",
        bytes.len()
    );

    let start = offset as usize;
    let end = start + bytes.len();
    if disk.len() < end {
        disk.resize(end, 0);
    }
    disk[start..end].copy_from_slice(bytes);

    Ok(Placement {
        name: name.to_string(),
        sector,
        offset,
        size: bytes.len(),
        capacity,
    })
}

/// Lay out the kernel and user images at their fixed sectors.
///
/// Sectors before the kernel stay zero and the image is padded to a whole
/// number of sectors.
pub fn build(kernel: &[u8], user: &[u8]) -> Result<DiskImage> {
    let window_sectors = (DISK_WINDOW_BYTES / SECTOR_SIZE) as u64;
    let mut bytes = Vec::new();
    let placements = vec![
        place(&mut bytes, "kernel", KERNEL_SECTOR, USER_SECTOR, kernel)?,
        place(&mut bytes, "user", USER_SECTOR, window_sectors, user)?,
    ];
    bytes.resize(bytes.len().next_multiple_of(SECTOR_SIZE), 0);

    Ok(DiskImage { bytes, placements })
}
