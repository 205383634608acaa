const INTERRUPT_BIT: usize = 1 << (usize::BITS - 1);
/// Only the low byte of `scause` selects the handler.
const CODE_MASK: usize = 0xff;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Trap<I, E> {
    Interrupt(I),
    Exception(E),
}

/// Decoded `scause`.
pub type TrapCause = Trap<Interrupt, Exception>;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Interrupt {
    SupervisorSoft,
    SupervisorTimer,
    SupervisorExternal,
    Unknown(usize),
}

impl From<usize> for Interrupt {
    fn from(code: usize) -> Self {
        match code {
            1 => Self::SupervisorSoft,
            5 => Self::SupervisorTimer,
            9 => Self::SupervisorExternal,
            other => Self::Unknown(other),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Exception {
    /// Instruction address misaligned
    InstructionMisaligned,
    /// Instruction access fault
    InstructionFault,
    /// Illegal instruction
    IllegalInstruction,
    Breakpoint,
    LoadMisaligned,
    LoadFault,
    StoreMisaligned,
    StoreFault,
    /// Environment call from U-mode
    UserEnvCall,
    SupervisorEnvCall,
    MachineEnvCall,
    InstructionPageFault,
    LoadPageFault,
    StorePageFault,
    Other(usize),
}

impl From<usize> for Exception {
    fn from(code: usize) -> Self {
        match code {
            0 => Self::InstructionMisaligned,
            1 => Self::InstructionFault,
            2 => Self::IllegalInstruction,
            3 => Self::Breakpoint,
            4 => Self::LoadMisaligned,
            5 => Self::LoadFault,
            6 => Self::StoreMisaligned,
            7 => Self::StoreFault,
            8 => Self::UserEnvCall,
            9 => Self::SupervisorEnvCall,
            11 => Self::MachineEnvCall,
            12 => Self::InstructionPageFault,
            13 => Self::LoadPageFault,
            15 => Self::StorePageFault,
            other => Self::Other(other),
        }
    }
}

impl Exception {
    pub fn is_page_fault(self) -> bool {
        matches!(
            self,
            Self::InstructionPageFault | Self::LoadPageFault | Self::StorePageFault
        )
    }
}

impl TrapCause {
    pub fn from_raw(scause: usize) -> Self {
        let code = scause & CODE_MASK;
        if scause & INTERRUPT_BIT != 0 {
            Trap::Interrupt(Interrupt::from(code))
        } else {
            Trap::Exception(Exception::from(code))
        }
    }

    /// Raw `scause` value for an interrupt code.
    pub const fn interrupt_bits(code: usize) -> usize {
        INTERRUPT_BIT | code
    }
}
