use log::LevelFilter;
use types::Region;
use types::boot::{UART0_BASE, USER_REGION, USER_SECTOR, USER_STACK_TOP};

/// Timer interrupts per second.
pub const TICKS_PER_SECOND: u64 = 100;

/// Compile-time kernel configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Frequency of the `time` counter in Hz.
    pub clock_frequency: u64,
    /// Counter ticks between two timer interrupts.
    pub tick_interval: u64,
    /// Emit a heartbeat every this many timer interrupts.
    pub heartbeat_ticks: u64,
    pub log_level: LevelFilter,
    /// Sector holding the user program image.
    pub user_sector: u64,
    pub user_region: Region,
    pub user_stack_top: usize,
    pub uart_base: usize,
}

impl Config {
    /// Layout of the QEMU `virt` machine.
    pub const QEMU_VIRT: Config = Config::with_clock(10_000_000);

    pub const fn with_clock(clock_frequency: u64) -> Self {
        Self {
            clock_frequency,
            tick_interval: clock_frequency / TICKS_PER_SECOND,
            heartbeat_ticks: 100,
            log_level: LevelFilter::Info,
            user_sector: USER_SECTOR,
            user_region: USER_REGION,
            user_stack_top: USER_STACK_TOP,
            uart_base: UART0_BASE,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::QEMU_VIRT
    }
}
