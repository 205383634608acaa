use thiserror::Error;

/// A read from the storage medium fell outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("read of {len:#x} bytes at offset {offset:#x} runs past the end of the medium ({size:#x} bytes)")]
    OutOfRange { offset: u64, len: usize, size: u64 },
}

/// An access through a [`crate::PhysRegion`] fell outside its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MemoryError {
    #[error("access of {len:#x} bytes at {addr:#x} is outside {base:#x}..{end:#x}")]
    OutOfRange {
        addr: u64,
        len: u64,
        base: usize,
        end: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("bad image magic {found:#010x}")]
    InvalidMagic { found: u32 },
    #[error("image header or program header table is truncated")]
    TruncatedHeader,
    #[error("segment {index}: mem_size {mem_size:#x} is smaller than file_size {file_size:#x}")]
    InvalidSegment {
        index: usize,
        file_size: u64,
        mem_size: u64,
    },
    #[error("image has more than {max} loadable segments")]
    TooManySegments { max: usize },
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Memory(#[from] MemoryError),
}

impl From<scroll::Error> for LoadError {
    fn from(_: scroll::Error) -> Self {
        LoadError::TruncatedHeader
    }
}
