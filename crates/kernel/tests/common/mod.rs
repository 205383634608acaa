#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use kernel::csr::{Csr, PrivilegedRegisters};
use kernel::{Config, OutputSink, TimerService, TrapDispatcher};
use loader::PhysRegion;
use loader::writer::{SegmentSpec, write_image};

pub const USER_BASE: usize = 0x8040_0000;
pub const USER_LEN: usize = 0x4000;

/// CSR file backed by a map; `time` advances by `time_step` on every read.
#[derive(Debug, Default)]
pub struct FakeRegisters {
    values: RefCell<HashMap<Csr, usize>>,
    time: Cell<usize>,
    time_step: usize,
    pub writes: Vec<(Csr, usize)>,
}

impl FakeRegisters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_step(time_step: usize) -> Self {
        Self {
            time_step,
            ..Self::default()
        }
    }

    pub fn set(&self, csr: Csr, value: usize) {
        if csr == Csr::Time {
            self.time.set(value);
        } else {
            self.values.borrow_mut().insert(csr, value);
        }
    }

    pub fn get(&self, csr: Csr) -> usize {
        if csr == Csr::Time {
            return self.time.get();
        }
        self.values.borrow().get(&csr).copied().unwrap_or(0)
    }

    pub fn writes_to(&self, csr: Csr) -> Vec<usize> {
        self.writes
            .iter()
            .filter(|(target, _)| *target == csr)
            .map(|(_, value)| *value)
            .collect()
    }
}

impl PrivilegedRegisters for FakeRegisters {
    fn read(&self, csr: Csr) -> usize {
        if csr == Csr::Time {
            let now = self.time.get();
            self.time.set(now + self.time_step);
            return now;
        }
        self.get(csr)
    }

    fn write(&mut self, csr: Csr, value: usize) {
        self.writes.push((csr, value));
        self.set(csr, value);
    }
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    bytes: RefCell<Vec<u8>>,
}

impl RecordingSink {
    pub fn output(&self) -> Vec<u8> {
        self.bytes.borrow().clone()
    }
}

impl OutputSink for RecordingSink {
    fn put(&self, byte: u8) {
        self.bytes.borrow_mut().push(byte);
    }
}

pub fn dispatcher(ram: &mut [u8]) -> TrapDispatcher<'_, FakeRegisters, RecordingSink> {
    TrapDispatcher::new(
        FakeRegisters::new(),
        TimerService::new(&Config::default()),
        RecordingSink::default(),
        PhysRegion::new(USER_BASE, ram),
    )
}

/// ELF image with one text segment at `USER_BASE` plus `bss` zeroed bytes.
pub fn user_image(entry: u64, text: &[u8], bss: u64) -> Vec<u8> {
    let mut buf = vec![0u8; 4096];
    let segment = SegmentSpec::load(USER_BASE as u64, text).with_mem_size(text.len() as u64 + bss);
    let len = write_image(&mut buf, entry, &[segment]).unwrap();
    buf.truncate(len);
    buf
}

/// Disk with `image` at `sector`.
pub fn disk_with(sector: u64, image: &[u8]) -> Vec<u8> {
    let offset = sector as usize * 512;
    let mut disk = vec![0u8; offset + image.len()];
    disk[offset..].copy_from_slice(image);
    disk
}
