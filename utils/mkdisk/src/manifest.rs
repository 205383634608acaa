use serde::Serialize;

use crate::elf::{ElfSummary, LoadSegment};
use crate::layout::Placement;

#[derive(Debug, Serialize)]
pub struct Component {
    #[serde(flatten)]
    pub placement: Placement,
    pub sectors: u64,
    pub entry: String,
    /// First bytes of the component, hex encoded.
    pub head: String,
    pub segments: Vec<LoadSegment>,
}

/// JSON description of a built disk image.
#[derive(Debug, Serialize)]
pub struct Manifest {
    pub sector_size: usize,
    pub total_bytes: usize,
    pub components: Vec<Component>,
}

impl Manifest {
    pub fn new(total_bytes: usize, parts: Vec<(Placement, ElfSummary, &[u8])>) -> Self {
        let components = parts
            .into_iter()
            .map(|(placement, elf, bytes)| Component {
                sectors: placement.sectors(),
                entry: format!("{:#x}", elf.entry),
                head: hex::encode(&bytes[..bytes.len().min(16)]),
                placement,
                segments: elf.segments,
            })
            .collect();
        Self {
            sector_size: types::SECTOR_SIZE,
            total_bytes,
            components,
        }
    }
}
