use core::slice;

use crate::error::StorageError;

pub use types::boot::{SECTOR_SIZE, sector_offset};

/// A flat, byte-addressable read source.
///
/// Sectors are a layout convention only; reads take arbitrary byte offsets.
pub trait BlockSource {
    /// Fill `dst` with the bytes starting at `offset`.
    fn read(&self, dst: &mut [u8], offset: u64) -> Result<(), StorageError>;

    /// Total size of the medium in bytes.
    fn size(&self) -> u64;
}

impl<T: BlockSource + ?Sized> BlockSource for &T {
    fn read(&self, dst: &mut [u8], offset: u64) -> Result<(), StorageError> {
        (**self).read(dst, offset)
    }

    fn size(&self) -> u64 {
        (**self).size()
    }
}

/// Storage backed by bytes already present in memory.
///
/// On QEMU the whole disk image is preloaded at `DISK_BASE`, so "reading a
/// sector" is a bounds-checked copy.
#[derive(Debug, Clone, Copy)]
pub struct MemoryDisk<'a> {
    bytes: &'a [u8],
}

impl<'a> MemoryDisk<'a> {
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// # Safety
    /// `[base, base + len)` must be readable memory that stays valid and
    /// unmodified for `'a`.
    pub unsafe fn from_raw(base: usize, len: usize) -> Self {
        Self {
            bytes: unsafe { slice::from_raw_parts(base as *const u8, len) },
        }
    }
}

impl BlockSource for MemoryDisk<'_> {
    fn read(&self, dst: &mut [u8], offset: u64) -> Result<(), StorageError> {
        let out_of_range = StorageError::OutOfRange {
            offset,
            len: dst.len(),
            size: self.size(),
        };
        let start = usize::try_from(offset).map_err(|_| out_of_range)?;
        let end = start.checked_add(dst.len()).ok_or(out_of_range)?;
        let src = self.bytes.get(start..end).ok_or(out_of_range)?;
        dst.copy_from_slice(src);
        Ok(())
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}
