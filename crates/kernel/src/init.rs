use log::info;
use loader::{BlockSource, LoadError, PhysRegion, sector_offset};

use crate::config::Config;
use crate::console::OutputSink;
use crate::csr::{Csr, PrivilegedRegisters};
use crate::privilege::PrivilegeTransition;
use crate::timer::TimerService;
use crate::trap::{TrapContext, TrapDispatcher, TrapOutcome};

/// Addresses the trap entry protocol needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrapVector {
    /// Address of the entry stub, written to `stvec` (direct mode).
    pub entry: usize,
    /// Kernel stack used while handling traps, parked in `sscratch`.
    pub stack_top: usize,
}

/// Kernel state shared by the boot path and the trap handler.
pub struct Kernel<'m, R, S> {
    config: Config,
    dispatcher: TrapDispatcher<'m, R, S>,
}

impl<'m, R, S> Kernel<'m, R, S>
where
    R: PrivilegedRegisters,
    S: OutputSink,
{
    pub fn new(config: Config, regs: R, sink: S, user_memory: PhysRegion<'m>) -> Self {
        let timer = TimerService::new(&config);
        Self {
            config,
            dispatcher: TrapDispatcher::new(regs, timer, sink, user_memory),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn dispatcher(&self) -> &TrapDispatcher<'m, R, S> {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut TrapDispatcher<'m, R, S> {
        &mut self.dispatcher
    }

    /// Bring the kernel up and load the user program from `disk`.
    ///
    /// On success the returned transition is the only way into user mode.
    pub fn boot<D: BlockSource + ?Sized>(
        &mut self,
        disk: &D,
        vector: TrapVector,
    ) -> Result<PrivilegeTransition, LoadError> {
        info!(target: "boot", "rvboot kernel starting");
        info!(
            target: "boot",
            "clock {} Hz, tick every {} cycles, user region {:#x}..{:#x}",
            self.config.clock_frequency,
            self.config.tick_interval,
            self.config.user_region.base,
            self.config.user_region.end()
        );

        self.install_trap_vector(vector);
        self.dispatcher.start_timer();
        self.load_user_program(disk)
    }

    pub fn install_trap_vector(&mut self, vector: TrapVector) {
        let regs = self.dispatcher.regs_mut();
        regs.write(Csr::Sscratch, vector.stack_top);
        regs.write(Csr::Stvec, vector.entry);
        info!(
            target: "boot",
            "trap vector at {:#x}, trap stack top {:#x}",
            vector.entry, vector.stack_top
        );
    }

    pub fn load_user_program<D: BlockSource + ?Sized>(
        &mut self,
        disk: &D,
    ) -> Result<PrivilegeTransition, LoadError> {
        let offset = sector_offset(self.config.user_sector);
        info!(
            target: "boot",
            "loading user program from sector {} (offset {offset:#x})",
            self.config.user_sector
        );
        let image = loader::load(disk, offset, self.dispatcher.memory_mut())?;
        Ok(PrivilegeTransition::new(&image, self.config.user_stack_top))
    }

    pub fn handle_trap(&mut self, ctx: &mut TrapContext) -> TrapOutcome {
        self.dispatcher.dispatch(ctx)
    }
}
