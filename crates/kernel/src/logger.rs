use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::console::{Console, OutputSink};

/// `log` backend printing `[LEVEL target] message` lines on a console.
pub struct ConsoleLogger<S> {
    console: Console<S>,
}

impl<S: OutputSink> ConsoleLogger<S> {
    pub const fn new(sink: S) -> Self {
        Self {
            console: Console::new(sink),
        }
    }

    pub fn console(&self) -> &Console<S> {
        &self.console
    }
}

impl<S: OutputSink + Send + Sync> Log for ConsoleLogger<S> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.console.write_args(format_args!(
                "[{:<5} {}] {}\n",
                record.level(),
                record.target(),
                record.args()
            ));
        }
    }

    fn flush(&self) {}
}

/// Install `logger` as the global logger.
pub fn init<S: OutputSink + Send + Sync>(
    logger: &'static ConsoleLogger<S>,
    level: LevelFilter,
) -> Result<(), SetLoggerError> {
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}
