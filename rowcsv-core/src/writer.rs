use memchr::{memchr, memchr3};

use crate::Dialect;

/// A builder for configuring a row writer.
///
/// This builder permits specifying the delimiter and quote character.
#[derive(Debug, Default)]
pub struct WriterBuilder {
    wtr: Writer,
}

impl WriterBuilder {
    /// Create a new builder for configuring a row writer.
    pub fn new() -> WriterBuilder {
        WriterBuilder::default()
    }

    /// Build a row writer from this configuration.
    ///
    /// # Panics
    ///
    /// If the delimiter and quote are the same character, or either one is
    /// `\n` or `\r`, then this panics.
    pub fn build(&self) -> Writer {
        let dialect = self.wtr.dialect;
        assert!(dialect.is_valid(), "invalid dialect: {:?}", dialect);
        self.wtr.clone()
    }

    /// Replace both the delimiter and quote with those of `dialect`.
    pub fn dialect(&mut self, dialect: Dialect) -> &mut WriterBuilder {
        self.wtr.dialect = dialect;
        self
    }

    /// The field delimiter to use when writing.
    ///
    /// The default is `,`.
    pub fn delimiter(&mut self, delimiter: char) -> &mut WriterBuilder {
        self.wtr.dialect.delimiter = delimiter;
        self
    }

    /// The quote character to use when writing.
    ///
    /// The default is `"`.
    pub fn quote(&mut self, quote: char) -> &mut WriterBuilder {
        self.wtr.dialect.quote = quote;
        self
    }
}

/// A writer for delimited rows.
///
/// The writer builds lines in a caller provided `String`. It holds no state
/// between rows other than its configuration, so the same writer can build
/// any number of lines in any order.
///
/// A field is quoted only when it has to be: when it contains the
/// delimiter, the quote character, `\n` or `\r`. Quotes inside a quoted
/// field are escaped by doubling them. Every line ends with a single `\n`.
#[derive(Clone, Debug, Default)]
pub struct Writer {
    dialect: Dialect,
}

impl Writer {
    /// Creates a new writer with the default configuration.
    pub fn new() -> Writer {
        Writer::default()
    }

    /// The dialect this writer was built with.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Returns true if `field` must be quoted to survive a round trip.
    pub fn needs_quotes(&self, field: &str) -> bool {
        let Dialect { delimiter, quote } = self.dialect;
        match self.dialect.ascii() {
            Some((d, q)) => {
                let bytes = field.as_bytes();
                memchr3(d, q, b'\n', bytes).is_some()
                    || memchr(b'\r', bytes).is_some()
            }
            None => field.chars().any(|c| {
                c == delimiter || c == quote || c == '\n' || c == '\r'
            }),
        }
    }

    /// Append `field` to `line`, quoting and escaping it when necessary.
    pub fn write_field(&self, field: &str, line: &mut String) {
        if !self.needs_quotes(field) {
            line.push_str(field);
            return;
        }
        let quote = self.dialect.quote;
        line.push(quote);
        let mut pieces = field.split(quote);
        if let Some(first) = pieces.next() {
            line.push_str(first);
        }
        for piece in pieces {
            line.push(quote);
            line.push(quote);
            line.push_str(piece);
        }
        line.push(quote);
    }

    /// Append a field delimiter to `line`.
    pub fn write_delimiter(&self, line: &mut String) {
        line.push(self.dialect.delimiter);
    }

    /// Append the record terminator to `line`.
    pub fn write_terminator(&self, line: &mut String) {
        line.push('\n');
    }

    /// Append a complete row, including its terminator, to `line`.
    ///
    /// A row with no fields produces just the terminator.
    pub fn write_record<I, T>(&self, record: I, line: &mut String)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        for (i, field) in record.into_iter().enumerate() {
            if i > 0 {
                self.write_delimiter(line);
            }
            self.write_field(field.as_ref(), line);
        }
        self.write_terminator(line);
    }
}
