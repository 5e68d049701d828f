use std::iter::FromIterator;
use std::ops;
use std::slice;
use std::vec;

/// A single row of text fields.
///
/// The order of fields is the column order. A row read by a `RowReader`
/// always has at least one field, and also records the position at which
/// it started.
///
/// Two rows are equal when their fields are equal; positions are ignored.
#[derive(Clone, Debug, Default, Eq)]
pub struct Row {
    fields: Vec<String>,
    pos: Option<Position>,
}

impl Row {
    /// Create a new empty row.
    pub fn new() -> Row {
        Row::default()
    }

    /// Create a new empty row with room for `capacity` fields.
    pub fn with_capacity(capacity: usize) -> Row {
        Row { fields: Vec::with_capacity(capacity), pos: None }
    }

    pub(crate) fn from_parts(fields: Vec<String>, pos: Position) -> Row {
        Row { fields, pos: Some(pos) }
    }

    /// Return the field at index `i`.
    ///
    /// If no field at index `i` exists, then this returns `None`.
    pub fn get(&self, i: usize) -> Option<&str> {
        self.fields.get(i).map(|f| &**f)
    }

    /// Returns true if and only if this row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the number of fields in this row.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Add a new field to the end of this row.
    pub fn push_field(&mut self, field: &str) {
        self.fields.push(field.to_string());
    }

    /// Remove all fields from this row.
    pub fn clear(&mut self) {
        self.fields.clear();
        self.pos = None;
    }

    /// Returns the position at which this row was read, if it was read.
    pub fn position(&self) -> Option<&Position> {
        self.pos.as_ref()
    }

    /// Returns an iterator over all fields in this row.
    pub fn iter(&self) -> RowIter<'_> {
        RowIter(self.fields.iter())
    }

    /// Returns the fields of this row as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.fields
    }

    /// Consume this row and return its fields.
    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Row) -> bool {
        self.fields == other.fields
    }
}

impl<T: AsRef<str>> PartialEq<[T]> for Row {
    fn eq(&self, other: &[T]) -> bool {
        self.fields.len() == other.len()
            && self.iter().zip(other).all(|(a, b)| a == b.as_ref())
    }
}

impl<T: AsRef<str>> PartialEq<Vec<T>> for Row {
    fn eq(&self, other: &Vec<T>) -> bool {
        *self == other[..]
    }
}

impl ops::Index<usize> for Row {
    type Output = str;

    fn index(&self, i: usize) -> &str {
        &self.fields[i]
    }
}

impl<T: Into<String>> From<Vec<T>> for Row {
    fn from(fields: Vec<T>) -> Row {
        Row::from_iter(fields)
    }
}

impl<'a> From<&'a [&'a str]> for Row {
    fn from(fields: &'a [&'a str]) -> Row {
        fields.iter().map(|&f| f).collect()
    }
}

impl From<Row> for Vec<String> {
    fn from(row: Row) -> Vec<String> {
        row.fields
    }
}

impl<T: Into<String>> FromIterator<T> for Row {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Row {
        Row { fields: iter.into_iter().map(Into::into).collect(), pos: None }
    }
}

impl<T: Into<String>> Extend<T> for Row {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.fields.extend(iter.into_iter().map(Into::into));
    }
}

impl<'a> IntoIterator for &'a Row {
    type IntoIter = RowIter<'a>;
    type Item = &'a str;

    fn into_iter(self) -> RowIter<'a> {
        self.iter()
    }
}

impl IntoIterator for Row {
    type IntoIter = vec::IntoIter<String>;
    type Item = String;

    fn into_iter(self) -> vec::IntoIter<String> {
        self.fields.into_iter()
    }
}

/// An iterator over the fields in a row.
#[derive(Clone, Debug)]
pub struct RowIter<'a>(slice::Iter<'a, String>);

impl<'a> Iterator for RowIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.0.next().map(|f| &**f)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a> DoubleEndedIterator for RowIter<'a> {
    fn next_back(&mut self) -> Option<&'a str> {
        self.0.next_back().map(|f| &**f)
    }
}

impl<'a> ExactSizeIterator for RowIter<'a> {}

/// A position in a character stream.
///
/// This tracks three numbers: the character offset (starting at `0`), the
/// line number (starting at `1`, counting every `\n` read, including those
/// inside quoted fields) and the row index (starting at `0`).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Position {
    char: u64,
    line: u64,
    row: u64,
}

impl Default for Position {
    fn default() -> Position {
        Position::new()
    }
}

impl Position {
    /// Returns a new position initialized to the start value.
    pub fn new() -> Position {
        Position { char: 0, line: 1, row: 0 }
    }

    /// The character offset, starting at `0`, of this position.
    pub fn char(&self) -> u64 {
        self.char
    }

    /// The line number, starting at `1`, of this position.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// The row index, starting at `0`, of this position.
    pub fn row(&self) -> u64 {
        self.row
    }

    /// Set the character offset of this position.
    pub fn set_char(&mut self, char: u64) -> &mut Position {
        self.char = char;
        self
    }

    /// Set the line number of this position.
    ///
    /// If the line number is less than `1`, then this method panics.
    pub fn set_line(&mut self, line: u64) -> &mut Position {
        assert!(line > 0);
        self.line = line;
        self
    }

    /// Set the row index of this position.
    pub fn set_row(&mut self, row: u64) -> &mut Position {
        self.row = row;
        self
    }
}
