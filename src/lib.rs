/*!
The `rowcsv` crate provides a streaming reader and writer for rows of text
fields separated by a delimiter, in the style of CSV.

The reader pulls characters from any [`CharSource`] and yields one [`Row`]
at a time. It accepts `\n`, `\r` and `\r\n` line endings, treats a quote
only as special at the start of a field, and by default recovers from
irregular quoting without complaint. A reader built with
[`ReaderBuilder::strict`] reports irregular quoting as
[`Error::MalformedQuoting`] and then carries on with the next row.

The writer quotes a field only when it has to: when the field contains the
delimiter, the quote character, `\n` or `\r`. Quotes inside a field are
doubled and every row ends with `\n`. Reading back what was written, with
the same [`Dialect`], yields the rows that were written.

# Example

```
use rowcsv::{ReaderBuilder, RowWriter};

let mut wtr = RowWriter::from_memory();
wtr.write_row(&["city", "note"]).unwrap();
wtr.write_row(&["Boston", "cold, \"very\""]).unwrap();
let data = wtr.into_inner().unwrap();
assert_eq!(data, "city,note\nBoston,\"cold, \"\"very\"\"\"\n");

let mut rdr = ReaderBuilder::new().strict(true).from_str(&data);
let rows: Vec<Vec<String>> = rdr
    .rows()
    .map(|row| row.map(|row| row.into_fields()))
    .collect::<Result<_, _>>()
    .unwrap();
assert_eq!(rows, vec![
    vec!["city", "note"],
    vec!["Boston", "cold, \"very\""],
]);
```

The state machine driving both halves lives in the `rowcsv-core` crate,
which does no I/O and can be used on its own.
*/

#![deny(missing_docs)]

pub use rowcsv_core::{Dialect, MalformedKind, MalformedQuoting};

pub use crate::error::{Error, Result};
pub use crate::reader::{
    IntoRowsIter, ReadRow, ReaderBuilder, RowReader, RowsIter,
};
pub use crate::row::{Position, Row, RowIter};
pub use crate::sink::{CharSink, IoSink};
pub use crate::source::{CharSource, IoSource};
pub use crate::writer::{RowWriter, WriterBuilder};

mod error;
mod reader;
mod row;
#[cfg(feature = "serde")]
mod serializer;
mod sink;
mod source;
mod writer;
