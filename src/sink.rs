use std::io::{self, Write};

/// A sink for the lines produced by a `RowWriter`.
///
/// Each row is handed to the sink as one complete line in a single
/// `write_str` call. Errors are handed back to the caller unmodified and
/// are never retried.
pub trait CharSink {
    /// Write all of `s` to the sink.
    fn write_str(&mut self, s: &str) -> io::Result<()>;

    /// Flush any buffered output.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a, S: CharSink + ?Sized> CharSink for &'a mut S {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        (**self).write_str(s)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

impl CharSink for String {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.push_str(s);
        Ok(())
    }
}

/// A character sink that writes UTF-8 to any `io::Write`.
///
/// Output is buffered, so there is no need to wrap the underlying writer
/// in a `BufWriter`. Call `flush` (or `RowWriter::flush`) to push buffered
/// lines through to the writer.
#[derive(Debug)]
pub struct IoSink<W: io::Write> {
    wtr: io::BufWriter<W>,
}

impl<W: io::Write> IoSink<W> {
    /// Create a new character sink for the given writer.
    pub fn new(wtr: W) -> IoSink<W> {
        IoSink { wtr: io::BufWriter::new(wtr) }
    }

    /// Create a new character sink with a buffer of `capacity` bytes.
    pub fn with_capacity(capacity: usize, wtr: W) -> IoSink<W> {
        IoSink { wtr: io::BufWriter::with_capacity(capacity, wtr) }
    }

    /// Returns a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        self.wtr.get_ref()
    }

    /// Flush the buffer and return the underlying writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.wtr.into_inner().map_err(|err| err.into())
    }
}

impl<W: io::Write> CharSink for IoSink<W> {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.wtr.write_all(s.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.wtr.flush()
    }
}
