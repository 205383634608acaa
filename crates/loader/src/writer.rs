//! Serialise ELF64 images into a caller-provided buffer.
//!
//! Disk images and tests need to produce executables without an allocator;
//! the layout written here is header, program header table, then segment
//! data in declaration order.

use scroll::{LE, Pwrite};

use crate::elf::{ELF_MAGIC, EM_RISCV, ElfHeader, PT_LOAD, ProgramHeader, SIZEOF_EHDR, SIZEOF_PHDR};

/// ELFCLASS64, ELFDATA2LSB, EV_CURRENT, then padding.
const IDENT: [u8; 12] = [2, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0];
const ET_EXEC: u16 = 2;

/// One program header plus the bytes it refers to.
#[derive(Clone, Copy, Debug)]
pub struct SegmentSpec<'d> {
    pub kind: u32,
    pub phys_addr: u64,
    pub data: &'d [u8],
    pub mem_size: u64,
    pub flags: u32,
}

impl<'d> SegmentSpec<'d> {
    /// A `PT_LOAD` segment whose memory size equals its data.
    pub fn load(phys_addr: u64, data: &'d [u8]) -> Self {
        Self {
            kind: PT_LOAD,
            phys_addr,
            data,
            mem_size: data.len() as u64,
            flags: 0b101,
        }
    }

    /// Extend the in-memory size past the data (zero-filled tail).
    pub fn with_mem_size(mut self, mem_size: u64) -> Self {
        self.mem_size = mem_size;
        self
    }

    pub fn with_kind(mut self, kind: u32) -> Self {
        self.kind = kind;
        self
    }
}

pub fn write_header(buf: &mut [u8], header: &ElfHeader) -> Result<usize, scroll::Error> {
    let offset = &mut 0;
    buf.gwrite_with(header.magic, offset, LE)?;
    for byte in header.ident {
        buf.gwrite_with(byte, offset, LE)?;
    }
    buf.gwrite_with(header.kind, offset, LE)?;
    buf.gwrite_with(header.machine, offset, LE)?;
    buf.gwrite_with(header.version, offset, LE)?;
    buf.gwrite_with(header.entry, offset, LE)?;
    buf.gwrite_with(header.phoff, offset, LE)?;
    buf.gwrite_with(header.shoff, offset, LE)?;
    buf.gwrite_with(header.flags, offset, LE)?;
    buf.gwrite_with(header.ehsize, offset, LE)?;
    buf.gwrite_with(header.phentsize, offset, LE)?;
    buf.gwrite_with(header.phnum, offset, LE)?;
    buf.gwrite_with(header.shentsize, offset, LE)?;
    buf.gwrite_with(header.shnum, offset, LE)?;
    buf.gwrite_with(header.shstrndx, offset, LE)?;
    Ok(*offset)
}

pub fn write_program_header(buf: &mut [u8], ph: &ProgramHeader) -> Result<usize, scroll::Error> {
    let offset = &mut 0;
    buf.gwrite_with(ph.kind, offset, LE)?;
    buf.gwrite_with(ph.flags, offset, LE)?;
    buf.gwrite_with(ph.offset, offset, LE)?;
    buf.gwrite_with(ph.vaddr, offset, LE)?;
    buf.gwrite_with(ph.paddr, offset, LE)?;
    buf.gwrite_with(ph.filesz, offset, LE)?;
    buf.gwrite_with(ph.memsz, offset, LE)?;
    buf.gwrite_with(ph.align, offset, LE)?;
    Ok(*offset)
}

/// Write a complete RISC-V executable into `buf`, returning its length.
pub fn write_image(buf: &mut [u8], entry: u64, segments: &[SegmentSpec<'_>]) -> Result<usize, scroll::Error> {
    let header = ElfHeader {
        magic: ELF_MAGIC,
        ident: IDENT,
        kind: ET_EXEC,
        machine: EM_RISCV,
        version: 1,
        entry,
        phoff: SIZEOF_EHDR as u64,
        ehsize: SIZEOF_EHDR as u16,
        phentsize: SIZEOF_PHDR as u16,
        phnum: segments.len() as u16,
        ..ElfHeader::default()
    };
    write_header(buf, &header)?;

    let mut data_offset = SIZEOF_EHDR + segments.len() * SIZEOF_PHDR;
    for (index, segment) in segments.iter().enumerate() {
        let ph = ProgramHeader {
            kind: segment.kind,
            flags: segment.flags,
            offset: data_offset as u64,
            vaddr: segment.phys_addr,
            paddr: segment.phys_addr,
            filesz: segment.data.len() as u64,
            memsz: segment.mem_size,
            align: 0x1000,
        };
        let at = SIZEOF_EHDR + index * SIZEOF_PHDR;
        write_program_header(buf.get_mut(at..).ok_or(scroll::Error::BadOffset(at))?, &ph)?;
        let end = data_offset + segment.data.len();
        buf.get_mut(data_offset..end)
            .ok_or(scroll::Error::BadOffset(data_offset))?
            .copy_from_slice(segment.data);
        data_offset += segment.data.len();
    }
    Ok(data_offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn written_headers_parse_back() {
        let mut buf = [0u8; 256];
        let len = write_image(&mut buf, 0x8040_0000, &[SegmentSpec::load(0x8040_0000, &[1, 2, 3, 4])]).unwrap();
        assert_eq!(len, SIZEOF_EHDR + SIZEOF_PHDR + 4);

        let header = ElfHeader::parse(&buf).unwrap();
        assert_eq!(header.entry, 0x8040_0000);
        assert_eq!(header.phnum, 1);

        let ph = ProgramHeader::parse(&buf[SIZEOF_EHDR..]).unwrap();
        assert!(ph.is_load());
        assert_eq!(ph.offset as usize, SIZEOF_EHDR + SIZEOF_PHDR);
        assert_eq!(&buf[ph.offset as usize..len], &[1, 2, 3, 4]);
    }

    #[test]
    fn small_buffer_is_an_error() {
        let mut buf = [0u8; 80];
        assert!(write_image(&mut buf, 0, &[SegmentSpec::load(0, &[0; 8])]).is_err());
    }
}
