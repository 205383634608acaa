//! On-disk ELF64 header layouts (little-endian).
//!
//! Only the fields the boot path needs are interpreted; the rest are parsed
//! so the layout stays faithful to the format.

use scroll::{LE, Pread};

/// "\x7FELF" read as a little-endian `u32`.
pub const ELF_MAGIC: u32 = 0x464C_457F;
/// Program header type of a loadable segment.
pub const PT_LOAD: u32 = 1;
/// Size of the ELF64 file header.
pub const SIZEOF_EHDR: usize = 64;
/// Size of one ELF64 program header entry.
pub const SIZEOF_PHDR: usize = 56;
/// `e_machine` value for RISC-V.
pub const EM_RISCV: u16 = 243;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ElfHeader {
    pub magic: u32,
    pub ident: [u8; 12],
    pub kind: u16,
    pub machine: u16,
    pub version: u32,
    pub entry: u64,
    pub phoff: u64,
    pub shoff: u64,
    pub flags: u32,
    pub ehsize: u16,
    pub phentsize: u16,
    pub phnum: u16,
    pub shentsize: u16,
    pub shnum: u16,
    pub shstrndx: u16,
}

impl ElfHeader {
    pub fn parse(bytes: &[u8]) -> Result<Self, scroll::Error> {
        let offset = &mut 0;
        let magic = bytes.gread_with(offset, LE)?;
        let mut ident = [0u8; 12];
        for byte in ident.iter_mut() {
            *byte = bytes.gread_with(offset, LE)?;
        }
        Ok(Self {
            magic,
            ident,
            kind: bytes.gread_with(offset, LE)?,
            machine: bytes.gread_with(offset, LE)?,
            version: bytes.gread_with(offset, LE)?,
            entry: bytes.gread_with(offset, LE)?,
            phoff: bytes.gread_with(offset, LE)?,
            shoff: bytes.gread_with(offset, LE)?,
            flags: bytes.gread_with(offset, LE)?,
            ehsize: bytes.gread_with(offset, LE)?,
            phentsize: bytes.gread_with(offset, LE)?,
            phnum: bytes.gread_with(offset, LE)?,
            shentsize: bytes.gread_with(offset, LE)?,
            shnum: bytes.gread_with(offset, LE)?,
            shstrndx: bytes.gread_with(offset, LE)?,
        })
    }

    pub fn has_valid_magic(&self) -> bool {
        self.magic == ELF_MAGIC
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProgramHeader {
    pub kind: u32,
    pub flags: u32,
    pub offset: u64,
    pub vaddr: u64,
    pub paddr: u64,
    pub filesz: u64,
    pub memsz: u64,
    pub align: u64,
}

impl ProgramHeader {
    pub fn parse(bytes: &[u8]) -> Result<Self, scroll::Error> {
        let offset = &mut 0;
        Ok(Self {
            kind: bytes.gread_with(offset, LE)?,
            flags: bytes.gread_with(offset, LE)?,
            offset: bytes.gread_with(offset, LE)?,
            vaddr: bytes.gread_with(offset, LE)?,
            paddr: bytes.gread_with(offset, LE)?,
            filesz: bytes.gread_with(offset, LE)?,
            memsz: bytes.gread_with(offset, LE)?,
            align: bytes.gread_with(offset, LE)?,
        })
    }

    pub fn is_load(&self) -> bool {
        self.kind == PT_LOAD
    }
}
