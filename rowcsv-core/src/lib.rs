/*!
`rowcsv-core` is the engine behind `rowcsv`: a character level state machine
for splitting delimited text into rows, and the escaping rules for writing
rows back out.

Nothing in this crate performs I/O. The [`Reader`](struct.Reader.html) is fed
one `char` at a time and hands back each row as soon as its terminator is
seen. The [`Writer`](struct.Writer.html) appends escaped fields to a caller
owned line buffer. Both are configured by a [`Dialect`](struct.Dialect.html),
which is fixed for the lifetime of the reader or writer built from it.

# Example

```
use rowcsv_core::{ReadResult, Reader};

let mut rdr = Reader::new();
let mut rows = vec![];
for c in "a,\"b,c\"\nx,y".chars() {
    if let ReadResult::Record(row) = rdr.read_char(c) {
        rows.push(row);
    }
}
if let ReadResult::Record(row) = rdr.finish() {
    rows.push(row);
}
assert_eq!(rows, vec![vec!["a", "b,c"], vec!["x", "y"]]);
```
*/

#![deny(missing_docs)]

pub use crate::reader::{
    MalformedKind, MalformedQuoting, ReadResult, Reader, ReaderBuilder,
};
pub use crate::writer::{Writer, WriterBuilder};

mod reader;
mod writer;

/// The delimiter and quote characters shared by readers and writers.
///
/// A dialect is a plain value. Readers and writers copy it at construction
/// time, so changing a `Dialect` after building never affects a reader or
/// writer that already exists.
///
/// The delimiter and quote must differ from each other and from `\n` and
/// `\r`, which are always record terminators. Builders refuse to build a
/// reader or writer from a dialect that breaks this rule; see
/// [`is_valid`](#method.is_valid).
///
/// When the `serde` feature is enabled, a dialect can be loaded from any
/// serde format. Missing keys take their default values.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Dialect {
    /// The field delimiter. The default is `,`.
    pub delimiter: char,
    /// The quote character. The default is `"`.
    pub quote: char,
}

impl Default for Dialect {
    fn default() -> Dialect {
        Dialect { delimiter: ',', quote: '"' }
    }
}

impl Dialect {
    /// Create a dialect with the default comma delimiter and double quote.
    pub fn new() -> Dialect {
        Dialect::default()
    }

    /// Return a copy of this dialect with a different delimiter.
    pub fn delimiter(self, delimiter: char) -> Dialect {
        Dialect { delimiter, ..self }
    }

    /// Return a copy of this dialect with a different quote character.
    pub fn quote(self, quote: char) -> Dialect {
        Dialect { quote, ..self }
    }

    /// Returns true if rows written with this dialect read back unchanged.
    ///
    /// This requires the delimiter and quote to be distinct, and neither to
    /// be `\n` or `\r`.
    pub fn is_valid(&self) -> bool {
        let terminator = |c: char| c == '\n' || c == '\r';
        self.delimiter != self.quote
            && !terminator(self.delimiter)
            && !terminator(self.quote)
    }

    /// Returns the delimiter and quote as single bytes when both are ASCII.
    ///
    /// ASCII bytes never occur inside a multi-byte UTF-8 sequence, so when
    /// this returns `Some`, searching the raw bytes of a `str` is exact.
    pub(crate) fn ascii(&self) -> Option<(u8, u8)> {
        if self.delimiter.is_ascii() && self.quote.is_ascii() {
            Some((self.delimiter as u8, self.quote as u8))
        } else {
            None
        }
    }
}
