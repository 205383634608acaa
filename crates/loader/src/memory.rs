use core::ops::Range;
use core::slice;

use crate::error::MemoryError;

/// Bounds-checked view of a physical address range `[base, base + len)`.
///
/// All addresses handed to the accessors are physical addresses; any access
/// that is not entirely inside the window is reported as
/// [`MemoryError::OutOfRange`] instead of touching memory.
#[derive(Debug)]
pub struct PhysRegion<'a> {
    base: usize,
    bytes: &'a mut [u8],
}

impl<'a> PhysRegion<'a> {
    /// Wrap `bytes` as the memory living at physical address `base`.
    pub fn new(base: usize, bytes: &'a mut [u8]) -> Self {
        Self { base, bytes }
    }

    /// # Safety
    /// `[base, base + len)` must be RAM that nothing else references for `'a`.
    pub unsafe fn from_raw(base: usize, len: usize) -> Self {
        Self {
            base,
            bytes: unsafe { slice::from_raw_parts_mut(base as *mut u8, len) },
        }
    }

    pub fn base(&self) -> usize {
        self.base
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn end(&self) -> usize {
        self.base + self.bytes.len()
    }

    pub fn contains(&self, addr: u64, len: u64) -> bool {
        self.range(addr, len).is_ok()
    }

    pub fn slice(&self, addr: u64, len: u64) -> Result<&[u8], MemoryError> {
        let range = self.range(addr, len)?;
        Ok(&self.bytes[range])
    }

    pub fn slice_mut(&mut self, addr: u64, len: u64) -> Result<&mut [u8], MemoryError> {
        let range = self.range(addr, len)?;
        Ok(&mut self.bytes[range])
    }

    pub fn write(&mut self, addr: u64, data: &[u8]) -> Result<(), MemoryError> {
        self.slice_mut(addr, data.len() as u64)?.copy_from_slice(data);
        Ok(())
    }

    pub fn zero(&mut self, addr: u64, len: u64) -> Result<(), MemoryError> {
        self.slice_mut(addr, len)?.fill(0);
        Ok(())
    }

    /// Little-endian 32-bit load, e.g. an instruction word.
    pub fn read_u32(&self, addr: u64) -> Result<u32, MemoryError> {
        let bytes = self.slice(addr, 4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn range(&self, addr: u64, len: u64) -> Result<Range<usize>, MemoryError> {
        let err = MemoryError::OutOfRange {
            addr,
            len,
            base: self.base,
            end: self.end(),
        };
        let start = usize::try_from(addr)
            .ok()
            .and_then(|addr| addr.checked_sub(self.base))
            .ok_or(err)?;
        let len = usize::try_from(len).map_err(|_| err)?;
        let end = start.checked_add(len).ok_or(err)?;
        if end > self.bytes.len() {
            return Err(err);
        }
        Ok(start..end)
    }
}
