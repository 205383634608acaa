use arrayvec::ArrayVec;
use log::{debug, info, trace, warn};

use crate::elf::{ElfHeader, PT_LOAD, ProgramHeader, SIZEOF_EHDR, SIZEOF_PHDR};
use crate::error::LoadError;
use crate::memory::PhysRegion;
use crate::storage::BlockSource;

/// Upper bound on loadable segments accepted from one image.
pub const MAX_SEGMENTS: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentKind {
    Null,
    Load,
    Dynamic,
    Interp,
    Note,
    Phdr,
    Tls,
    Other(u32),
}

impl From<u32> for SegmentKind {
    fn from(value: u32) -> Self {
        match value {
            0 => SegmentKind::Null,
            PT_LOAD => SegmentKind::Load,
            2 => SegmentKind::Dynamic,
            3 => SegmentKind::Interp,
            4 => SegmentKind::Note,
            6 => SegmentKind::Phdr,
            7 => SegmentKind::Tls,
            other => SegmentKind::Other(other),
        }
    }
}

/// One segment that was copied into memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadableSegment {
    pub kind: SegmentKind,
    pub file_offset: u64,
    pub virtual_addr: u64,
    pub physical_addr: u64,
    pub file_size: u64,
    pub mem_size: u64,
    pub align: u64,
    pub flags: u32,
}

impl LoadableSegment {
    /// Bytes zero-filled after the file-backed part.
    pub fn bss_size(&self) -> u64 {
        self.mem_size - self.file_size
    }
}

/// Result of a successful [`load`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutableImage {
    magic: u32,
    entry: u64,
    segments: ArrayVec<LoadableSegment, MAX_SEGMENTS>,
}

impl ExecutableImage {
    pub fn magic(&self) -> u32 {
        self.magic
    }

    pub fn entry(&self) -> u64 {
        self.entry
    }

    pub fn segments(&self) -> &[LoadableSegment] {
        &self.segments
    }
}

/// Load the ELF64 image stored at `base_offset` in `source` into `memory`.
///
/// Each `PT_LOAD` segment has its `file_size` bytes copied to its physical
/// address and the remaining `mem_size - file_size` bytes zeroed. Other
/// segment types are skipped. Nothing is written when the magic is wrong,
/// and no byte outside `memory` is ever touched.
pub fn load<S: BlockSource + ?Sized>(
    source: &S,
    base_offset: u64,
    memory: &mut PhysRegion<'_>,
) -> Result<ExecutableImage, LoadError> {
    let mut raw = [0u8; SIZEOF_EHDR];
    source
        .read(&mut raw, base_offset)
        .map_err(|_| LoadError::TruncatedHeader)?;
    let header = ElfHeader::parse(&raw)?;

    if !header.has_valid_magic() {
        warn!(
            target: "loader",
            "bad image magic at offset {base_offset:#x}: found {:#010x}",
            header.magic
        );
        return Err(LoadError::InvalidMagic {
            found: header.magic,
        });
    }
    debug!(
        target: "loader",
        "image header: entry={:#x} phoff={:#x} phnum={} phentsize={}",
        header.entry, header.phoff, header.phnum, header.phentsize
    );

    let stride = header.phentsize as u64;
    if header.phnum > 0 && (header.phentsize as usize) < SIZEOF_PHDR {
        return Err(LoadError::TruncatedHeader);
    }

    let mut segments = ArrayVec::<LoadableSegment, MAX_SEGMENTS>::new();
    for index in 0..header.phnum as usize {
        let ph_offset = (index as u64)
            .checked_mul(stride)
            .and_then(|rel| rel.checked_add(header.phoff))
            .and_then(|rel| rel.checked_add(base_offset))
            .ok_or(LoadError::TruncatedHeader)?;
        let mut raw = [0u8; SIZEOF_PHDR];
        source
            .read(&mut raw, ph_offset)
            .map_err(|_| LoadError::TruncatedHeader)?;
        let ph = ProgramHeader::parse(&raw)?;

        if !ph.is_load() {
            trace!(
                target: "loader",
                "segment {index}: skipping {:?}",
                SegmentKind::from(ph.kind)
            );
            continue;
        }
        if ph.memsz < ph.filesz {
            return Err(LoadError::InvalidSegment {
                index,
                file_size: ph.filesz,
                mem_size: ph.memsz,
            });
        }

        let segment = LoadableSegment {
            kind: SegmentKind::Load,
            file_offset: ph.offset,
            virtual_addr: ph.vaddr,
            physical_addr: ph.paddr,
            file_size: ph.filesz,
            mem_size: ph.memsz,
            align: ph.align,
            flags: ph.flags,
        };
        segments
            .try_push(segment)
            .map_err(|_| LoadError::TooManySegments { max: MAX_SEGMENTS })?;

        let src_offset = base_offset
            .checked_add(ph.offset)
            .ok_or(LoadError::TruncatedHeader)?;
        let dst = memory.slice_mut(ph.paddr, ph.memsz)?;
        let (file_part, bss) = dst.split_at_mut(ph.filesz as usize);
        source.read(file_part, src_offset)?;
        bss.fill(0);

        debug!(
            target: "loader",
            "segment {index}: {:#x} bytes from {:#x} to {:#x}, {:#x} zeroed",
            ph.filesz,
            ph.offset,
            ph.paddr,
            segment.bss_size()
        );
    }

    info!(
        target: "loader",
        "loaded image: entry={:#x}, {} loadable segment(s)",
        header.entry,
        segments.len()
    );
    Ok(ExecutableImage {
        magic: header.magic,
        entry: header.entry,
        segments,
    })
}
