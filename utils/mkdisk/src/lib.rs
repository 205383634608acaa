//! Disk image assembly for the QEMU boot flow.
//!
//! The image is a flat file addressed in 512-byte sectors: sectors 0-3 are
//! reserved, the kernel ELF starts at sector 4 and the user ELF at sector 64.

pub mod elf;
pub mod layout;
pub mod manifest;

pub use elf::{ElfSummary, LoadSegment, inspect};
pub use layout::{DiskImage, Placement, build};
pub use manifest::Manifest;
