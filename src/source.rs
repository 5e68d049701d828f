use std::io;
use std::str;

/// The default capacity of the byte buffer used by `IoSource`.
pub(crate) const BUF_SIZE: usize = 8 * (1 << 10);

/// A source of characters for a `RowReader`.
///
/// Implementations produce one character per call and signal exhaustion
/// with `Ok(None)`. Any error is handed to the caller of `read_row`
/// unmodified.
pub trait CharSource {
    /// Return the next character, or `None` once the source is exhausted.
    fn next_char(&mut self) -> io::Result<Option<char>>;
}

impl<'a, S: CharSource + ?Sized> CharSource for &'a mut S {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        (**self).next_char()
    }
}

impl<'a> CharSource for str::Chars<'a> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        Ok(self.next())
    }
}

/// A character source that decodes UTF-8 from any `io::Read`.
///
/// Reads are buffered, so there is no need to wrap the underlying reader in
/// a `BufReader`. A character whose encoding is split across two reads is
/// decoded correctly. Bytes that are not valid UTF-8 produce an error of
/// kind `io::ErrorKind::InvalidData`.
#[derive(Debug)]
pub struct IoSource<R> {
    rdr: R,
    buf: Box<[u8]>,
    /// The start of unconsumed bytes in `buf`.
    pos: usize,
    /// The end of valid bytes in `buf`.
    end: usize,
    /// Set once `rdr` has reported EOF.
    eof: bool,
}

impl<R: io::Read> IoSource<R> {
    /// Create a new character source for the given reader.
    pub fn new(rdr: R) -> IoSource<R> {
        IoSource::with_capacity(BUF_SIZE, rdr)
    }

    /// Create a new character source with a buffer of `capacity` bytes.
    ///
    /// The capacity is raised to `4` if it is smaller, since that is the
    /// longest encoding of a single character.
    pub fn with_capacity(capacity: usize, rdr: R) -> IoSource<R> {
        let capacity = if capacity < 4 { 4 } else { capacity };
        IoSource {
            rdr,
            buf: vec![0; capacity].into_boxed_slice(),
            pos: 0,
            end: 0,
            eof: false,
        }
    }

    /// Returns a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.rdr
    }

    /// Returns a mutable reference to the underlying reader.
    ///
    /// Reading from it directly will skip over buffered input.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.rdr
    }

    /// Unwraps this source, returning the underlying reader.
    ///
    /// Any buffered but unconsumed input is lost.
    pub fn into_inner(self) -> R {
        self.rdr
    }

    /// Ensure at least four bytes are buffered unless the reader is at EOF.
    fn fill(&mut self) -> io::Result<()> {
        while !self.eof && self.end - self.pos < 4 {
            if self.pos > 0 {
                self.buf.copy_within(self.pos..self.end, 0);
                self.end -= self.pos;
                self.pos = 0;
            }
            match self.rdr.read(&mut self.buf[self.end..]) {
                Ok(0) => self.eof = true,
                Ok(n) => self.end += n,
                Err(ref err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }
}

impl<R: io::Read> CharSource for IoSource<R> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        if self.end - self.pos < 4 {
            self.fill()?;
        }
        let pending = &self.buf[self.pos..self.end];
        if pending.is_empty() {
            return Ok(None);
        }
        match bstr::decode_utf8(pending) {
            (Some(c), n) => {
                self.pos += n;
                Ok(Some(c))
            }
            (None, n) => {
                let msg = format!("invalid UTF-8 sequence {:?}", &pending[..n]);
                // Skip the bad bytes so a caller that keeps reading makes
                // progress.
                self.pos += n;
                Err(io::Error::new(io::ErrorKind::InvalidData, msg))
            }
        }
    }
}
