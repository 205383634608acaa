use core::fmt;

use bitflags::bitflags;

bitflags! {
    /// Extension bits of `misa`; bit n stands for letter `'A' + n`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Extensions: u32 {
        const A = 1 << 0;
        const C = 1 << 2;
        const D = 1 << 3;
        const F = 1 << 5;
        const H = 1 << 7;
        const I = 1 << 8;
        const M = 1 << 12;
        const S = 1 << 18;
        const U = 1 << 20;
        const _ = (1 << 26) - 1;
    }
}

/// Decoded `misa` register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Isa {
    /// Native register width in bits, 0 when `misa` is not implemented.
    pub xlen: u32,
    pub extensions: Extensions,
}

impl Isa {
    pub fn from_misa(misa: usize) -> Self {
        let mxl = (misa as u64) >> 62;
        let xlen = match mxl {
            1 => 32,
            2 => 64,
            3 => 128,
            _ => 0,
        };
        Self {
            xlen,
            extensions: Extensions::from_bits_truncate(misa as u32),
        }
    }

    pub fn has_supervisor(&self) -> bool {
        self.extensions.contains(Extensions::S)
    }

    pub fn has_user(&self) -> bool {
        self.extensions.contains(Extensions::U)
    }
}

impl fmt::Display for Isa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RV{}", self.xlen)?;
        for bit in 0..26u32 {
            if self.extensions.bits() & (1 << bit) != 0 {
                write!(f, "{}", char::from(b'A' + bit as u8))?;
            }
        }
        Ok(())
    }
}
