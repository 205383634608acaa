use core::fmt;

use types::syscall::STDOUT;

use crate::syscall::write;

/// `fmt::Write` over `write(STDOUT, ..)`.
pub struct Stdout;

impl fmt::Write for Stdout {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if s.is_empty() || write(STDOUT, s.as_bytes()) >= 0 {
            Ok(())
        } else {
            Err(fmt::Error)
        }
    }
}

#[doc(hidden)]
pub fn _print(args: fmt::Arguments<'_>) {
    let _ = fmt::Write::write_fmt(&mut Stdout, args);
}

#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => {
        $crate::print::_print(format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! println {
    () => {
        $crate::print!("\n")
    };
    ($($arg:tt)*) => {
        $crate::print::_print(format_args!("{}\n", format_args!($($arg)*)))
    };
}
