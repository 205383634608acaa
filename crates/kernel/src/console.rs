use core::fmt;

/// A blocking byte-oriented output device.
pub trait OutputSink {
    fn put(&self, byte: u8);
}

impl<S: OutputSink + ?Sized> OutputSink for &S {
    fn put(&self, byte: u8) {
        (**self).put(byte)
    }
}

/// Text console over an [`OutputSink`]; `\n` goes out as `\r\n`.
pub struct Console<S> {
    sink: S,
}

impl<S: OutputSink> Console<S> {
    pub const fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn putc(&self, byte: u8) {
        if byte == b'\n' {
            self.sink.put(b'\r');
        }
        self.sink.put(byte);
    }

    pub fn write_bytes(&self, bytes: &[u8]) {
        for &byte in bytes {
            self.putc(byte);
        }
    }

    pub fn write_args(&self, args: fmt::Arguments<'_>) {
        let _ = fmt::write(&mut Writer(self), args);
    }
}

struct Writer<'c, S>(&'c Console<S>);

impl<S: OutputSink> fmt::Write for Writer<'_, S> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_bytes(s.as_bytes());
        Ok(())
    }
}

impl<S: OutputSink> OutputSink for Console<S> {
    fn put(&self, byte: u8) {
        self.putc(byte)
    }
}
