use log::info;

use crate::config::Config;
use crate::csr::{Csr, PrivilegedRegisters};

/// Periodic timer interrupts plus the millisecond clock.
///
/// `ticks` and `next_deadline` are written only from the timer interrupt path
/// (and once at boot).
#[derive(Debug)]
pub struct TimerService {
    ticks: u64,
    next_deadline: u64,
    interval: u64,
    clock_frequency: u64,
    heartbeat_ticks: u64,
}

impl TimerService {
    pub const fn new(config: &Config) -> Self {
        Self {
            ticks: 0,
            next_deadline: 0,
            interval: config.tick_interval,
            clock_frequency: config.clock_frequency,
            heartbeat_ticks: config.heartbeat_ticks,
        }
    }

    /// Arm the first timer interrupt.
    pub fn init<R: PrivilegedRegisters + ?Sized>(&mut self, regs: &mut R) {
        self.rearm(regs);
        info!(
            target: "timer",
            "timer armed: {} Hz clock, interrupt every {} cycles",
            self.clock_frequency, self.interval
        );
    }

    /// Handle one timer interrupt.
    pub fn tick<R: PrivilegedRegisters + ?Sized>(&mut self, regs: &mut R) {
        self.ticks += 1;
        self.rearm(regs);
        if self.heartbeat_ticks != 0 && self.ticks % self.heartbeat_ticks == 0 {
            info!(
                target: "timer",
                "heartbeat: {} ticks, uptime {}s",
                self.ticks,
                self.now_ms(regs) / 1000
            );
        }
    }

    /// Milliseconds since the counter started. Reads the counter every call.
    pub fn now_ms<R: PrivilegedRegisters + ?Sized>(&self, regs: &R) -> u64 {
        let time = regs.read(Csr::Time) as u128;
        (time * 1000)
            .checked_div(self.clock_frequency as u128)
            .unwrap_or(0) as u64
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn next_deadline(&self) -> u64 {
        self.next_deadline
    }

    fn rearm<R: PrivilegedRegisters + ?Sized>(&mut self, regs: &mut R) {
        let now = regs.read(Csr::Time) as u64;
        self.next_deadline = now.wrapping_add(self.interval);
        regs.write(Csr::Stimecmp, self.next_deadline as usize);
    }
}
