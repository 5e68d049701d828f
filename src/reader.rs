use std::fs::File;
use std::io;
use std::path::Path;
use std::str;

use rowcsv_core::{
    Dialect, ReadResult, Reader as CoreReader,
    ReaderBuilder as CoreReaderBuilder,
};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::row::{Position, Row};
use crate::source::{CharSource, IoSource, BUF_SIZE};

/// Builds a row reader with various configuration knobs.
///
/// This builder can be used to tweak the field delimiter, quote character
/// and quoting policy. Once a `RowReader` is built, its configuration
/// cannot be changed.
///
/// The methods starting with `from_` panic if the delimiter and quote are
/// the same character, or if either one is `\n` or `\r`. See
/// `Dialect::is_valid`.
#[derive(Debug)]
pub struct ReaderBuilder {
    builder: CoreReaderBuilder,
    capacity: usize,
}

impl Default for ReaderBuilder {
    fn default() -> ReaderBuilder {
        ReaderBuilder {
            builder: CoreReaderBuilder::default(),
            capacity: BUF_SIZE,
        }
    }
}

impl ReaderBuilder {
    /// Create a new builder for configuring row reading.
    ///
    /// To convert a builder into a reader, call one of the methods starting
    /// with `from_`.
    ///
    /// # Example
    ///
    /// ```
    /// use rowcsv::{ReaderBuilder, Row};
    ///
    /// let data = "city;country\nBoston;\"United States\"\n";
    /// let mut rdr = ReaderBuilder::new().delimiter(';').from_str(data);
    /// let rows: Vec<Row> = rdr.rows().collect::<rowcsv::Result<_>>().unwrap();
    /// assert_eq!(rows[1], vec!["Boston", "United States"]);
    /// ```
    pub fn new() -> ReaderBuilder {
        ReaderBuilder::default()
    }

    /// Build a row reader from this configuration that reads characters
    /// from `src`.
    pub fn from_source<S: CharSource>(&self, src: S) -> RowReader<S> {
        RowReader::new(self, src)
    }

    /// Build a row reader from this configuration that reads from an
    /// in-memory string.
    pub fn from_str<'a>(&self, data: &'a str) -> RowReader<str::Chars<'a>> {
        RowReader::new(self, data.chars())
    }

    /// Build a row reader from this configuration that decodes UTF-8 from
    /// `rdr`.
    ///
    /// The reader is buffered for you automatically.
    pub fn from_reader<R: io::Read>(&self, rdr: R) -> RowReader<IoSource<R>> {
        RowReader::new(self, IoSource::with_capacity(self.capacity, rdr))
    }

    /// Build a row reader from this configuration that reads from the file
    /// at the given path.
    ///
    /// If there was a problem opening the file, then this returns the
    /// corresponding error.
    pub fn from_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<RowReader<IoSource<File>>> {
        Ok(self.from_reader(File::open(path)?))
    }

    /// Replace both the delimiter and quote with those of `dialect`.
    pub fn dialect(&mut self, dialect: Dialect) -> &mut ReaderBuilder {
        self.builder.dialect(dialect);
        self
    }

    /// The field delimiter to use when parsing.
    ///
    /// The default is `,`.
    pub fn delimiter(&mut self, delimiter: char) -> &mut ReaderBuilder {
        self.builder.delimiter(delimiter);
        self
    }

    /// The quote character to use when parsing.
    ///
    /// The default is `"`.
    pub fn quote(&mut self, quote: char) -> &mut ReaderBuilder {
        self.builder.quote(quote);
        self
    }

    /// Whether to report irregular quoting as an error.
    ///
    /// When disabled (the default), a quote in the middle of an unquoted
    /// field is kept as a literal character, and data following the closing
    /// quote of a quoted field continues the same field.
    ///
    /// When enabled, both cases make `read_row` return
    /// `Error::MalformedQuoting`. The rest of the offending line is skipped,
    /// and reading may continue with the next line.
    pub fn strict(&mut self, yes: bool) -> &mut ReaderBuilder {
        self.builder.strict(yes);
        self
    }

    /// Set the capacity (in bytes) of the buffer used by `from_reader` and
    /// `from_path`.
    pub fn buffer_capacity(&mut self, capacity: usize) -> &mut ReaderBuilder {
        self.capacity = capacity;
        self
    }
}

/// The outcome of asking a `RowReader` for its next row.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ReadRow {
    /// The next row in the stream.
    Row(Row),
    /// All rows have been read.
    ///
    /// Once a reader returns `End`, it returns `End` for every later call.
    End,
}

impl ReadRow {
    /// Returns true if and only if this is the end of the stream.
    pub fn is_end(&self) -> bool {
        *self == ReadRow::End
    }

    /// Converts this into the row it carries, if any.
    pub fn into_row(self) -> Option<Row> {
        match self {
            ReadRow::Row(row) => Some(row),
            ReadRow::End => None,
        }
    }
}

/// A pull based reader of delimited rows.
///
/// A `RowReader` takes characters from a `CharSource` one at a time and
/// produces one `Row` per call to `read_row`. It never reads ahead of the
/// row it is producing, and never holds more than one row in memory.
///
/// Quoted fields may contain delimiters, quotes (written as two quotes) and
/// line breaks. Outside of quotes, `\n`, `\r` and `\r\n` each end a row.
/// A blank line produces a row with one empty field. No trailing empty row
/// is produced when the input ends with a line terminator.
///
/// There is no special handling of header rows; the first row is returned
/// like any other.
///
/// # Example
///
/// ```
/// use rowcsv::{ReadRow, RowReader};
///
/// let mut rdr = RowReader::from_str("a,\"b\nc\"\nx,y");
/// let first = rdr.read_row().unwrap().into_row().unwrap();
/// assert_eq!(first, vec!["a", "b\nc"]);
/// let second = rdr.read_row().unwrap().into_row().unwrap();
/// assert_eq!(second, vec!["x", "y"]);
/// assert_eq!(rdr.read_row().unwrap(), ReadRow::End);
/// assert_eq!(rdr.read_row().unwrap(), ReadRow::End);
/// ```
#[derive(Debug)]
pub struct RowReader<S> {
    core: CoreReader,
    src: S,
    /// The position of the next character to be read.
    pos: Position,
    /// The position of the first character of the row being read.
    row_start: Position,
}

impl<'a> RowReader<str::Chars<'a>> {
    /// Create a new reader with a default configuration for an in-memory
    /// string.
    pub fn from_str(data: &'a str) -> RowReader<str::Chars<'a>> {
        ReaderBuilder::new().from_str(data)
    }
}

impl<R: io::Read> RowReader<IoSource<R>> {
    /// Create a new reader with a default configuration that decodes UTF-8
    /// from `rdr`.
    pub fn from_reader(rdr: R) -> RowReader<IoSource<R>> {
        ReaderBuilder::new().from_reader(rdr)
    }
}

impl RowReader<IoSource<File>> {
    /// Create a new reader with a default configuration for the file at
    /// the given path.
    pub fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<RowReader<IoSource<File>>> {
        ReaderBuilder::new().from_path(path)
    }
}

impl<S: CharSource> RowReader<S> {
    fn new(builder: &ReaderBuilder, src: S) -> RowReader<S> {
        RowReader {
            core: builder.builder.build(),
            src,
            pos: Position::new(),
            row_start: Position::new(),
        }
    }

    /// Create a new reader with a default configuration for any character
    /// source.
    pub fn from_source(src: S) -> RowReader<S> {
        ReaderBuilder::new().from_source(src)
    }

    /// Read the next row.
    ///
    /// This returns `ReadRow::End` once the source is exhausted, and on
    /// every call after that. The source is not consulted again after the
    /// end has been reported.
    ///
    /// Errors from the source are returned unmodified. The row being read
    /// is kept, so a later call continues it with whatever the source
    /// yields next. In strict mode, `Error::MalformedQuoting` is
    /// returned for irregular quoting and the rest of that line is skipped.
    pub fn read_row(&mut self) -> Result<ReadRow> {
        if self.core.is_done() {
            return Ok(ReadRow::End);
        }
        loop {
            let c = match self.src.next_char()? {
                Some(c) => c,
                None => return Ok(self.finish()),
            };
            let at = self.pos;
            if !self.core.in_record() {
                self.row_start = at;
            }
            self.pos.set_char(at.char() + 1);
            if c == '\n' {
                self.pos.set_line(at.line() + 1);
            }
            match self.core.read_char(c) {
                ReadResult::InputNeeded => {}
                ReadResult::Record(fields) => {
                    return Ok(ReadRow::Row(self.emit(fields)));
                }
                ReadResult::Malformed(err) => {
                    debug!(
                        row = self.row_start.row(),
                        line = at.line(),
                        offset = at.char(),
                        "malformed quoting, skipping to the next line"
                    );
                    return Err(Error::MalformedQuoting {
                        pos: self.row_start,
                        offset: at.char(),
                        err,
                    });
                }
                ReadResult::End => return Ok(ReadRow::End),
            }
        }
    }

    /// Returns a borrowed iterator over all rows.
    ///
    /// Each item yielded is either a row or an error. Iteration stops after
    /// the end of the stream, and after the first I/O error. A malformed
    /// quoting error (in strict mode) does not stop iteration.
    pub fn rows(&mut self) -> RowsIter<'_, S> {
        RowsIter { rdr: self, stopped: false }
    }

    /// Returns an owned iterator over all rows.
    ///
    /// This is just like `rows`, except it takes ownership of the reader.
    pub fn into_rows(self) -> IntoRowsIter<S> {
        IntoRowsIter { rdr: self, stopped: false }
    }

    /// Returns the position of the next character to be read.
    ///
    /// Its row index is the number of rows produced so far.
    pub fn position(&self) -> &Position {
        &self.pos
    }

    /// Returns true if and only if this reader has reported the end of the
    /// stream.
    pub fn is_done(&self) -> bool {
        self.core.is_done()
    }

    /// The dialect this reader was built with.
    pub fn dialect(&self) -> Dialect {
        self.core.dialect()
    }

    /// Returns a reference to the underlying character source.
    pub fn get_ref(&self) -> &S {
        &self.src
    }

    /// Returns a mutable reference to the underlying character source.
    ///
    /// Taking characters from it directly will corrupt the row being read.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.src
    }

    /// Unwraps this reader, returning the underlying character source.
    ///
    /// Any partially read row is lost.
    pub fn into_inner(self) -> S {
        self.src
    }

    fn finish(&mut self) -> ReadRow {
        match self.core.finish() {
            ReadResult::Record(fields) => ReadRow::Row(self.emit(fields)),
            _ => {
                trace!(rows = self.pos.row(), "end of rows");
                ReadRow::End
            }
        }
    }

    fn emit(&mut self, fields: Vec<String>) -> Row {
        let row = Row::from_parts(fields, self.row_start);
        self.pos.set_row(self.row_start.row() + 1);
        row
    }
}

/// A borrowed iterator over rows.
///
/// The lifetime parameter `'r` refers to the lifetime of the underlying
/// row reader.
#[derive(Debug)]
pub struct RowsIter<'r, S> {
    rdr: &'r mut RowReader<S>,
    stopped: bool,
}

impl<'r, S: CharSource> RowsIter<'r, S> {
    /// Return a reference to the underlying row reader.
    pub fn reader(&self) -> &RowReader<S> {
        &self.rdr
    }
}

impl<'r, S: CharSource> Iterator for RowsIter<'r, S> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Result<Row>> {
        next_row(&mut *self.rdr, &mut self.stopped)
    }
}

/// An owned iterator over rows.
#[derive(Debug)]
pub struct IntoRowsIter<S> {
    rdr: RowReader<S>,
    stopped: bool,
}

impl<S: CharSource> IntoRowsIter<S> {
    /// Drop this iterator and return the underlying row reader.
    pub fn into_reader(self) -> RowReader<S> {
        self.rdr
    }
}

impl<S: CharSource> Iterator for IntoRowsIter<S> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Result<Row>> {
        next_row(&mut self.rdr, &mut self.stopped)
    }
}

fn next_row<S: CharSource>(
    rdr: &mut RowReader<S>,
    stopped: &mut bool,
) -> Option<Result<Row>> {
    if *stopped {
        return None;
    }
    match rdr.read_row() {
        Ok(ReadRow::Row(row)) => Some(Ok(row)),
        Ok(ReadRow::End) => {
            *stopped = true;
            None
        }
        Err(err) => {
            if err.is_io_error() {
                *stopped = true;
            }
            Some(Err(err))
        }
    }
}
