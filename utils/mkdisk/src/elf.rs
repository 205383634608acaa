use anyhow::{Context, Result, bail, ensure};
use goblin::elf::Elf;
use goblin::elf::header::EM_RISCV;
use goblin::elf::program_header::PT_LOAD;
use serde::Serialize;
use types::Region;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadSegment {
    pub paddr: u64,
    pub file_size: u64,
    pub mem_size: u64,
}

/// What the boot path will see when it loads this ELF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElfSummary {
    pub entry: u64,
    pub segments: Vec<LoadSegment>,
}

/// Check that `bytes` is a loadable RV64 executable targeting `region`.
pub fn inspect(name: &str, bytes: &[u8], region: Region) -> Result<ElfSummary> {
    let elf = Elf::parse(bytes).with_context(|| format!("{name}: not a valid ELF file"))?;

    ensure!(elf.is_64, "{name}: expected a 64-bit ELF");
    ensure!(elf.little_endian, "{name}: expected a little-endian ELF");
    if elf.header.e_machine != EM_RISCV {
        bail!(
            "{name}: machine {} is not RISC-V ({EM_RISCV})",
            elf.header.e_machine
        );
    }

    let mut segments = Vec::new();
    for (index, ph) in elf.program_headers.iter().enumerate() {
        if ph.p_type != PT_LOAD {
            continue;
        }
        ensure!(
            ph.p_memsz >= ph.p_filesz,
            "{name}: segment {index} has memsz {:#x} < filesz {:#x}",
            ph.p_memsz,
            ph.p_filesz
        );
        let file_end = ph.p_offset.checked_add(ph.p_filesz);
        ensure!(
            file_end.is_some_and(|end| end <= bytes.len() as u64),
            "{name}: segment {index} data runs past the end of the file"
        );
        ensure!(
            region.contains(ph.p_paddr as usize, ph.p_memsz as usize),
            "{name}: segment {index} at {:#x}+{:#x} is outside {:#x}..{:#x}",
            ph.p_paddr,
            ph.p_memsz,
            region.base,
            region.end()
        );
        segments.push(LoadSegment {
            paddr: ph.p_paddr,
            file_size: ph.p_filesz,
            mem_size: ph.p_memsz,
        });
    }
    ensure!(!segments.is_empty(), "{name}: no PT_LOAD segments");
    ensure!(
        region.contains(elf.entry as usize, 4),
        "{name}: entry {:#x} is outside {:#x}..{:#x}",
        elf.entry,
        region.base,
        region.end()
    );

    Ok(ElfSummary {
        entry: elf.entry,
        segments,
    })
}
