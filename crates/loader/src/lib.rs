#![cfg_attr(not(test), no_std)]
//! Executable image loading for the boot path.
//!
//! This crate reads an ELF64 image from a flat storage medium and copies its
//! loadable segments into a bounds-checked window of physical memory:
//! - the stage-0 bootloader uses it for the kernel (sector 4),
//! - the kernel uses it for the user program (sector 64).
//!
//! It never touches memory outside the [`PhysRegion`] it is handed, and it
//! never allocates.

pub mod elf;
pub mod error;
pub mod image;
pub mod memory;
pub mod storage;
pub mod writer;

pub use error::{LoadError, MemoryError, StorageError};
pub use image::{ExecutableImage, LoadableSegment, MAX_SEGMENTS, SegmentKind, load};
pub use memory::PhysRegion;
pub use storage::{BlockSource, MemoryDisk, SECTOR_SIZE, sector_offset};
