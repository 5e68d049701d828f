use core::fmt;
use core::mem;

use tracing::debug;

use crate::Dialect;

/// A push based row reader.
///
/// This reader parses delimited text using a small state machine. Callers
/// feed it one character at a time with `read_char`, and tell it when the
/// input is exhausted with `finish`. Each completed row is handed back by
/// value; the reader keeps no copy of it.
///
/// # Leniency
///
/// By default the reader never fails and always finds *a* parse:
///
/// * A quote that appears after the first character of an unquoted field is
///   kept as a literal character.
/// * A character other than a quote, delimiter or terminator that follows
///   the closing quote of a quoted field is appended to the same field,
///   which continues unquoted.
///
/// When built with `strict(true)`, both of these instead produce a
/// `ReadResult::Malformed`, after which the reader skips ahead to the next
/// `\n` or `\r` and starts a fresh row.
///
/// # Terminators
///
/// `\n`, `\r` and `\r\n` are each a single record terminator outside of
/// quotes. Inside quotes they are field data. A blank line is a row with one
/// empty field.
#[derive(Clone, Debug)]
pub struct Reader {
    /// The delimiter and quote characters.
    dialect: Dialect,
    /// Whether irregular quoting is reported instead of tolerated.
    strict: bool,
    /// The current state.
    state: State,
    /// The field being accumulated.
    field: String,
    /// The completed fields of the row being accumulated.
    row: Vec<String>,
    /// The current line number.
    line: u64,
}

impl Default for Reader {
    fn default() -> Reader {
        Reader {
            dialect: Dialect::default(),
            strict: false,
            state: State::StartRecord,
            field: String::new(),
            row: vec![],
            line: 1,
        }
    }
}

/// Builds a row reader with various configuration knobs.
///
/// Once a `Reader` is built, its configuration cannot be changed.
#[derive(Debug, Default)]
pub struct ReaderBuilder {
    rdr: Reader,
}

impl ReaderBuilder {
    /// Create a new builder.
    pub fn new() -> ReaderBuilder {
        ReaderBuilder::default()
    }

    /// Build a row reader from this configuration.
    ///
    /// # Panics
    ///
    /// If the delimiter and quote are the same character, or either one is
    /// `\n` or `\r`, then this panics.
    pub fn build(&self) -> Reader {
        let dialect = self.rdr.dialect;
        assert!(dialect.is_valid(), "invalid dialect: {:?}", dialect);
        self.rdr.clone()
    }

    /// Replace both the delimiter and quote with those of `dialect`.
    pub fn dialect(&mut self, dialect: Dialect) -> &mut ReaderBuilder {
        self.rdr.dialect = dialect;
        self
    }

    /// The field delimiter to use when parsing.
    ///
    /// The default is `,`.
    pub fn delimiter(&mut self, delimiter: char) -> &mut ReaderBuilder {
        self.rdr.dialect.delimiter = delimiter;
        self
    }

    /// The quote character to use when parsing.
    ///
    /// The default is `"`.
    pub fn quote(&mut self, quote: char) -> &mut ReaderBuilder {
        self.rdr.dialect.quote = quote;
        self
    }

    /// Report irregular quoting instead of recovering from it.
    ///
    /// This is disabled by default.
    pub fn strict(&mut self, yes: bool) -> &mut ReaderBuilder {
        self.rdr.strict = yes;
        self
    }
}

/// The result of feeding one character (or the end of input) to a reader.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ReadResult {
    /// The character was consumed and no row is complete yet.
    InputNeeded,
    /// A row was completed. Ownership of its fields passes to the caller.
    Record(Vec<String>),
    /// Irregular quoting was found in strict mode.
    ///
    /// The partially read row has been discarded.
    Malformed(MalformedQuoting),
    /// All input has been read.
    ///
    /// Once returned, every later call returns `End` again.
    End,
}

impl ReadResult {
    /// Returns true if and only if this result carries a completed row.
    pub fn is_record(&self) -> bool {
        match *self {
            ReadResult::Record(_) => true,
            _ => false,
        }
    }
}

/// A quote found somewhere a strict reader does not accept it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MalformedQuoting {
    /// Where the irregularity was found.
    pub kind: MalformedKind,
    /// The character that triggered the error.
    pub found: char,
}

/// The kinds of irregular quoting a strict reader reports.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MalformedKind {
    /// A quote appeared after the first character of an unquoted field.
    QuoteInUnquotedField,
    /// A quoted field was closed and followed by something other than a
    /// delimiter, a record terminator or another quote.
    DataAfterClosingQuote,
}

impl fmt::Display for MalformedQuoting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MalformedKind::QuoteInUnquotedField => write!(
                f,
                "found quote {:?} inside an unquoted field",
                self.found
            ),
            MalformedKind::DataAfterClosingQuote => write!(
                f,
                "found {:?} after the closing quote of a quoted field",
                self.found
            ),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum State {
    /// Nothing of the current row has been read.
    StartRecord,
    /// A delimiter was just read; the next field is empty so far.
    StartField,
    InField,
    InQuotedField,
    /// A quote was read inside a quoted field. The next character decides
    /// between an escaped quote and the end of the field.
    InQuotePending,
    /// A row just ended on `\r`. A `\n` read here belongs to it.
    CRLF,
    /// Strict mode found an error. Skip to the next terminator.
    Resync,
    End,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Action {
    Discard,
    Append,
    /// Append after tolerating an irregular quote.
    Recover,
    EndField,
    EndRecord,
    Malformed(MalformedKind),
}

impl Reader {
    /// Create a new reader with a default configuration.
    pub fn new() -> Reader {
        ReaderBuilder::new().build()
    }

    /// The dialect this reader was built with.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Whether this reader reports irregular quoting.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Reset the reader such that it behaves as if it had never been used.
    ///
    /// Any partially read row is dropped.
    pub fn reset(&mut self) {
        self.state = State::StartRecord;
        self.field.clear();
        self.row.clear();
        self.line = 1;
    }

    /// Return the current line number as measured by the number of
    /// occurrences of `\n`, including those inside quoted fields.
    ///
    /// Line numbers start at `1` and are reset when `reset` is called.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Returns true if a row has been started but not yet completed.
    pub fn in_record(&self) -> bool {
        match self.state {
            State::StartRecord | State::CRLF | State::Resync | State::End => {
                false
            }
            _ => true,
        }
    }

    /// Returns true if and only if `finish` has reported `End`.
    pub fn is_done(&self) -> bool {
        self.state == State::End
    }

    /// Feed the next character of input.
    pub fn read_char(&mut self, c: char) -> ReadResult {
        if self.state == State::End {
            return ReadResult::End;
        }
        if c == '\n' {
            self.line += 1;
        }
        let (state, action) = self.transition(self.state, c);
        self.state = state;
        match action {
            Action::Discard => ReadResult::InputNeeded,
            Action::Append => {
                self.field.push(c);
                ReadResult::InputNeeded
            }
            Action::Recover => {
                debug!(
                    line = self.line,
                    found = ?c,
                    "tolerating irregular quote"
                );
                self.field.push(c);
                ReadResult::InputNeeded
            }
            Action::EndField => {
                self.end_field();
                ReadResult::InputNeeded
            }
            Action::EndRecord => {
                self.end_field();
                ReadResult::Record(mem::replace(&mut self.row, vec![]))
            }
            Action::Malformed(kind) => {
                self.field.clear();
                self.row.clear();
                ReadResult::Malformed(MalformedQuoting { kind, found: c })
            }
        }
    }

    /// Signal that the input is exhausted.
    ///
    /// If any character has been read since the last completed row, the
    /// pending field and row are completed and returned. Otherwise (and on
    /// every call after that) this returns `End`.
    pub fn finish(&mut self) -> ReadResult {
        let in_record = self.in_record();
        self.state = State::End;
        if in_record {
            self.end_field();
            ReadResult::Record(mem::replace(&mut self.row, vec![]))
        } else {
            ReadResult::End
        }
    }

    fn end_field(&mut self) {
        let field = mem::replace(&mut self.field, String::new());
        self.row.push(field);
    }

    fn irregular(&self, to: State, kind: MalformedKind) -> (State, Action) {
        if self.strict {
            (State::Resync, Action::Malformed(kind))
        } else {
            (to, Action::Recover)
        }
    }

    fn transition(&self, state: State, c: char) -> (State, Action) {
        use self::State::*;

        let Dialect { delimiter, quote } = self.dialect;
        match state {
            End => (End, Action::Discard),
            CRLF if c == '\n' => (StartRecord, Action::Discard),
            StartRecord | StartField | CRLF => {
                if c == quote {
                    (InQuotedField, Action::Discard)
                } else {
                    self.transition_unquoted(c)
                }
            }
            InField => {
                if c == quote {
                    self.irregular(InField, MalformedKind::QuoteInUnquotedField)
                } else {
                    self.transition_unquoted(c)
                }
            }
            InQuotedField => {
                if c == quote {
                    (InQuotePending, Action::Discard)
                } else {
                    (InQuotedField, Action::Append)
                }
            }
            InQuotePending => {
                if c == quote {
                    (InQuotedField, Action::Append)
                } else if c == delimiter || c == '\n' || c == '\r' {
                    self.transition_unquoted(c)
                } else {
                    self.irregular(InField, MalformedKind::DataAfterClosingQuote)
                }
            }
            Resync => match c {
                '\n' => (StartRecord, Action::Discard),
                '\r' => (CRLF, Action::Discard),
                _ => (Resync, Action::Discard),
            },
        }
    }

    /// Transitions shared by every state where `c` is outside of quotes and
    /// is not itself an opening quote.
    fn transition_unquoted(&self, c: char) -> (State, Action) {
        if c == self.dialect.delimiter {
            (State::StartField, Action::EndField)
        } else if c == '\n' {
            (State::StartRecord, Action::EndRecord)
        } else if c == '\r' {
            (State::CRLF, Action::EndRecord)
        } else {
            (State::InField, Action::Append)
        }
    }
}
