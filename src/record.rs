use std::fmt;
use std::iter::FromIterator;
use std::ops;

use bstr::ByteSlice;

/// A single DSV record stored as raw bytes.
///
/// All fields are stored contiguously in one buffer, with a separate list
/// of field ending offsets. A record therefore never allocates per field.
///
/// A record is fully overwritten on every call to
/// [`Reader::read_record`](crate::Reader::read_record): callers must copy
/// out any field they need to keep past the next read. Note the difference
/// between a record with zero fields (a freshly created or cleared record,
/// never produced by the reader) and a record with one empty field (what an
/// empty input line parses to).
#[derive(Clone, Default, Eq, PartialEq)]
pub struct Record {
    /// All fields in this record, stored contiguously.
    fields: Vec<u8>,
    /// The ending offset of each field within `fields`.
    ends: Vec<usize>,
}

impl Record {
    /// Create a new empty record.
    pub fn new() -> Record {
        Record::default()
    }

    /// Create a new empty record with capacity for `buffer` bytes of field
    /// data and `fields` fields.
    pub fn with_capacity(buffer: usize, fields: usize) -> Record {
        Record {
            fields: Vec::with_capacity(buffer),
            ends: Vec::with_capacity(fields),
        }
    }

    /// Returns the number of fields in this record.
    pub fn len(&self) -> usize {
        self.ends.len()
    }

    /// Returns true if and only if this record has no fields.
    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    /// Clear this record so that it has zero fields.
    ///
    /// This is not necessary before reusing the record with the reader,
    /// which clears it itself.
    pub fn clear(&mut self) {
        self.fields.clear();
        self.ends.clear();
    }

    /// Return the field at index `i`.
    ///
    /// If no field at index `i` exists, then this returns `None`.
    pub fn get(&self, i: usize) -> Option<&[u8]> {
        let end = *self.ends.get(i)?;
        let start = if i == 0 { 0 } else { self.ends[i - 1] };
        Some(&self.fields[start..end])
    }

    /// Add a new field to this record.
    pub fn push_field(&mut self, field: &[u8]) {
        self.fields.extend_from_slice(field);
        self.ends.push(self.fields.len());
    }

    /// Returns an iterator over all fields in this record.
    pub fn iter(&self) -> RecordIter {
        RecordIter { record: self, start: 0, i: 0 }
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let fields: Vec<_> = self.iter().map(|f| f.as_bstr()).collect();
        write!(f, "Record({:?})", fields)
    }
}

impl ops::Index<usize> for Record {
    type Output = [u8];
    fn index(&self, i: usize) -> &[u8] {
        self.get(i).unwrap()
    }
}

impl<T: AsRef<[u8]>> From<Vec<T>> for Record {
    fn from(fields: Vec<T>) -> Record {
        Record::from_iter(fields)
    }
}

impl<'a, T: AsRef<[u8]>> From<&'a [T]> for Record {
    fn from(fields: &'a [T]) -> Record {
        Record::from_iter(fields)
    }
}

impl<T: AsRef<[u8]>> FromIterator<T> for Record {
    fn from_iter<I: IntoIterator<Item = T>>(fields: I) -> Record {
        let mut record = Record::new();
        for field in fields {
            record.push_field(field.as_ref());
        }
        record
    }
}

impl<T: AsRef<[u8]>> PartialEq<Vec<T>> for Record {
    fn eq(&self, other: &Vec<T>) -> bool {
        self == &**other
    }
}

impl<T: AsRef<[u8]>> PartialEq<[T]> for Record {
    fn eq(&self, other: &[T]) -> bool {
        self.len() == other.len()
            && self.iter().zip(other).all(|(a, b)| a == b.as_ref())
    }
}

impl<'a> IntoIterator for &'a Record {
    type IntoIter = RecordIter<'a>;
    type Item = &'a [u8];
    fn into_iter(self) -> RecordIter<'a> {
        self.iter()
    }
}

/// An iterator over the fields in a record.
pub struct RecordIter<'a> {
    record: &'a Record,
    start: usize,
    i: usize,
}

impl<'a> Iterator for RecordIter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        let end = *self.record.ends.get(self.i)?;
        let field = &self.record.fields[self.start..end];
        self.start = end;
        self.i += 1;
        Some(field)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.record.len() - self.i;
        (remaining, Some(remaining))
    }
}
