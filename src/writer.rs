use std::fs::File;
use std::io;
use std::path::Path;

use rowcsv_core::{
    Dialect, Writer as CoreWriter, WriterBuilder as CoreWriterBuilder,
};
#[cfg(feature = "serde")]
use serde::Serialize;
#[cfg(feature = "serde")]
use tracing::debug;

use crate::error::Result;
#[cfg(feature = "serde")]
use crate::serializer::serialize_record;
use crate::sink::{CharSink, IoSink};
use crate::source::BUF_SIZE;

/// Builds a row writer with various configuration knobs.
///
/// This builder can be used to tweak the field delimiter and quote
/// character. Once a `RowWriter` is built, its configuration cannot be
/// changed.
///
/// The methods starting with `from_` panic if the delimiter and quote are
/// the same character, or if either one is `\n` or `\r`. See
/// `Dialect::is_valid`.
#[derive(Debug)]
pub struct WriterBuilder {
    builder: CoreWriterBuilder,
    capacity: usize,
}

impl Default for WriterBuilder {
    fn default() -> WriterBuilder {
        WriterBuilder {
            builder: CoreWriterBuilder::default(),
            capacity: BUF_SIZE,
        }
    }
}

impl WriterBuilder {
    /// Create a new builder for configuring row writing.
    ///
    /// To convert a builder into a writer, call one of the methods starting
    /// with `from_`.
    ///
    /// # Example
    ///
    /// ```
    /// use rowcsv::WriterBuilder;
    ///
    /// let mut wtr = WriterBuilder::new().delimiter('\t').from_memory();
    /// wtr.write_row(&["a", "b\tc"]).unwrap();
    /// assert_eq!(wtr.as_str(), "a\t\"b\tc\"\n");
    /// ```
    pub fn new() -> WriterBuilder {
        WriterBuilder::default()
    }

    /// Build a row writer from this configuration that hands lines to
    /// `sink`.
    pub fn from_sink<W: CharSink>(&self, sink: W) -> RowWriter<W> {
        RowWriter::new(self, sink)
    }

    /// Build a row writer from this configuration that collects its output
    /// in a `String`.
    pub fn from_memory(&self) -> RowWriter<String> {
        RowWriter::new(self, String::new())
    }

    /// Build a row writer from this configuration that writes UTF-8 to
    /// `wtr`.
    ///
    /// The writer is buffered for you automatically.
    pub fn from_writer<W: io::Write>(&self, wtr: W) -> RowWriter<IoSink<W>> {
        RowWriter::new(self, IoSink::with_capacity(self.capacity, wtr))
    }

    /// Build a row writer from this configuration that writes to the file
    /// at the given path.
    ///
    /// The file is created if it does not already exist and is truncated
    /// otherwise.
    pub fn from_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<RowWriter<IoSink<File>>> {
        Ok(self.from_writer(File::create(path)?))
    }

    /// Replace both the delimiter and quote with those of `dialect`.
    pub fn dialect(&mut self, dialect: Dialect) -> &mut WriterBuilder {
        self.builder.dialect(dialect);
        self
    }

    /// The field delimiter to use when writing.
    ///
    /// The default is `,`.
    pub fn delimiter(&mut self, delimiter: char) -> &mut WriterBuilder {
        self.builder.delimiter(delimiter);
        self
    }

    /// The quote character to use when writing.
    ///
    /// The default is `"`.
    pub fn quote(&mut self, quote: char) -> &mut WriterBuilder {
        self.builder.quote(quote);
        self
    }

    /// Set the capacity (in bytes) of the buffer used by `from_writer` and
    /// `from_path`.
    pub fn buffer_capacity(&mut self, capacity: usize) -> &mut WriterBuilder {
        self.capacity = capacity;
        self
    }
}

/// A writer of delimited rows.
///
/// Each call to `write_row` builds one complete line in memory and hands it
/// to the sink in a single write. A field is quoted only when it contains
/// the delimiter, the quote character, `\n` or `\r`, and quotes inside it
/// are doubled. Every line ends with `\n`.
///
/// Reading the output back with a `RowReader` of the same dialect yields
/// the rows that were written. The one exception is a row with no fields,
/// which is written as an empty line and therefore reads back as a row with
/// a single empty field.
///
/// # Example
///
/// ```
/// use rowcsv::RowWriter;
///
/// let mut wtr = RowWriter::from_memory();
/// wtr.write_rows(vec![
///     vec!["name", "quote"],
///     vec!["Ann", "He said \"hi\""],
/// ]).unwrap();
/// assert_eq!(wtr.as_str(), "name,quote\nAnn,\"He said \"\"hi\"\"\"\n");
/// ```
#[derive(Debug)]
pub struct RowWriter<W> {
    core: CoreWriter,
    sink: W,
}

impl RowWriter<String> {
    /// Create a new writer with a default configuration that collects its
    /// output in a `String`.
    pub fn from_memory() -> RowWriter<String> {
        WriterBuilder::new().from_memory()
    }

    /// Returns everything written so far.
    pub fn as_str(&self) -> &str {
        &self.sink
    }
}

impl<W: io::Write> RowWriter<IoSink<W>> {
    /// Create a new writer with a default configuration that writes UTF-8
    /// to `wtr`.
    pub fn from_writer(wtr: W) -> RowWriter<IoSink<W>> {
        WriterBuilder::new().from_writer(wtr)
    }
}

impl RowWriter<IoSink<File>> {
    /// Create a new writer with a default configuration that writes to the
    /// file at the given path.
    pub fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<RowWriter<IoSink<File>>> {
        WriterBuilder::new().from_path(path)
    }
}

impl<W: CharSink> RowWriter<W> {
    fn new(builder: &WriterBuilder, sink: W) -> RowWriter<W> {
        RowWriter { core: builder.builder.build(), sink }
    }

    /// Create a new writer with a default configuration for any character
    /// sink.
    pub fn from_sink(sink: W) -> RowWriter<W> {
        WriterBuilder::new().from_sink(sink)
    }

    /// Write a single row.
    ///
    /// Any iterator of string-like fields may be written. Values that are
    /// not text must be converted by the caller first, or written with
    /// `serialize`.
    ///
    /// An error from the sink is returned unmodified and is not retried.
    pub fn write_row<I, T>(&mut self, row: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut line = String::new();
        self.core.write_record(row, &mut line);
        self.sink.write_str(&line)?;
        Ok(())
    }

    /// Write many rows.
    ///
    /// This is exactly equivalent to calling `write_row` once per row, and
    /// stops at the first error. Rows before the failing one have been
    /// handed to the sink.
    pub fn write_rows<I, R, T>(&mut self, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        for row in rows {
            self.write_row(row)?;
        }
        Ok(())
    }

    /// Serialize a single record and write it as a row.
    ///
    /// Sequences, tuples, structs and their nestings are flattened into
    /// fields in order. Scalars become a single field: numbers are
    /// formatted with `itoa` and `ryu`, booleans as `true`/`false`, unit
    /// variants by their name, and `None` or `()` as an empty field.
    ///
    /// Maps, enum variants with tuple or struct data, and byte strings that
    /// are not valid UTF-8 have no text form and fail with
    /// `Error::UnsupportedValue`. Nothing is written for a failed record.
    ///
    /// # Example
    ///
    /// ```
    /// use rowcsv::RowWriter;
    ///
    /// let mut wtr = RowWriter::from_memory();
    /// wtr.serialize(("Boston", 42, 1.5, None::<u8>)).unwrap();
    /// assert_eq!(wtr.as_str(), "Boston,42,1.5,\n");
    /// ```
    #[cfg(feature = "serde")]
    pub fn serialize<S: Serialize>(&mut self, record: S) -> Result<()> {
        let fields = serialize_record(&record).map_err(|err| {
            debug!(error = %err, "record has no text form");
            err
        })?;
        self.write_row(&fields)
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    /// The dialect this writer was built with.
    pub fn dialect(&self) -> Dialect {
        self.core.dialect()
    }

    /// Returns a reference to the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Returns a mutable reference to the underlying sink.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    /// Flush the sink and return it.
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.sink)
    }
}
