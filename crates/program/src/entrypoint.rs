/// Declare the program's `main`. The generated `_start` runs it and passes
/// its return value to `exit`.
#[macro_export]
macro_rules! entry {
    ($main:path) => {
        #[unsafe(no_mangle)]
        #[unsafe(link_section = ".text.entry")]
        pub extern "C" fn _start() -> ! {
            let code: i32 = $main();
            $crate::syscall::exit(code)
        }
    };
}
