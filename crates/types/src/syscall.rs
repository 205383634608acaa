//! Syscall numbers shared by the kernel router and the user runtime.

/// Descriptor of the console output stream.
pub const STDOUT: usize = 1;
/// Descriptor of the console input stream.
pub const STDIN: usize = 0;
/// Value returned in `a0` by a failed or unsupported syscall.
pub const SYSCALL_ERROR: isize = -1;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum Syscall {
    Write = 1,
    Exit = 2,
    Getpid = 3,
    Sleep = 4,
    Yield = 5,
    Time = 6,
    Exec = 7,
    Fork = 8,
    Wait = 9,
    Open = 10,
    Close = 11,
    Read = 12,
}

impl Syscall {
    pub const COUNT: usize = 12;

    /// Every syscall, ordered by number.
    pub const ALL: [Syscall; Self::COUNT] = [
        Syscall::Write,
        Syscall::Exit,
        Syscall::Getpid,
        Syscall::Sleep,
        Syscall::Yield,
        Syscall::Time,
        Syscall::Exec,
        Syscall::Fork,
        Syscall::Wait,
        Syscall::Open,
        Syscall::Close,
        Syscall::Read,
    ];

    pub const fn number(self) -> usize {
        self as usize
    }

    /// Zero-based slot in a dispatch table.
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    pub const fn name(self) -> &'static str {
        match self {
            Syscall::Write => "write",
            Syscall::Exit => "exit",
            Syscall::Getpid => "getpid",
            Syscall::Sleep => "sleep",
            Syscall::Yield => "yield",
            Syscall::Time => "time",
            Syscall::Exec => "exec",
            Syscall::Fork => "fork",
            Syscall::Wait => "wait",
            Syscall::Open => "open",
            Syscall::Close => "close",
            Syscall::Read => "read",
        }
    }
}

impl TryFrom<usize> for Syscall {
    /// The unrecognised number.
    type Error = usize;

    fn try_from(number: usize) -> Result<Self, Self::Error> {
        match number {
            1..=Self::COUNT => Ok(Self::ALL[number - 1]),
            _ => Err(number),
        }
    }
}
