use std::error;
use std::fmt;
use std::io;
use std::result;

use rowcsv_core::MalformedQuoting;

use crate::row::Position;

/// A type alias for `Result<T, rowcsv::Error>`.
pub type Result<T> = result::Result<T, Error>;

/// An error that can occur when reading or writing rows.
///
/// Every error is scoped to the single `read_row` or `write_row` call that
/// produced it. Rows read or written before the error remain valid.
#[derive(Debug)]
pub enum Error {
    /// An I/O error from the underlying character source or sink.
    ///
    /// This also covers input that is not valid UTF-8.
    Io(io::Error),
    /// Irregular quoting found by a reader built with `strict(true)`.
    ///
    /// Lenient readers (the default) never return this error.
    MalformedQuoting {
        /// The position of the row in which the irregularity was found.
        pos: Position,
        /// The character offset of the offending character.
        offset: u64,
        /// What was found.
        err: MalformedQuoting,
    },
    /// A value handed to the writer has no deterministic text form.
    UnsupportedValue(String),
}

impl Error {
    /// Returns true if this is an I/O error.
    pub fn is_io_error(&self) -> bool {
        match *self {
            Error::Io(_) => true,
            _ => false,
        }
    }

    /// The position of the row an error refers to, if any.
    pub fn position(&self) -> Option<&Position> {
        match *self {
            Error::MalformedQuoting { ref pos, .. } => Some(pos),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            Error::MalformedQuoting { .. } => None,
            Error::UnsupportedValue(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::Io(ref err) => err.fmt(f),
            Error::MalformedQuoting { ref pos, offset, ref err } => write!(
                f,
                "CSV parse error: row {} (char {}, line {}): at char {}: {}",
                pos.row(),
                pos.char(),
                pos.line(),
                offset,
                err
            ),
            Error::UnsupportedValue(ref msg) => {
                write!(f, "CSV write error: {}", msg)
            }
        }
    }
}
