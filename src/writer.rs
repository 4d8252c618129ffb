use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::mem;
use std::path::Path;

use memchr::{memchr, memchr3};

use crate::dialect::Dialect;
use crate::error::Result;
use crate::record::Record;

/// The quoting style to use when encoding fields.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QuoteStyle {
    /// Quote a field only when necessary: when it contains the delimiter,
    /// the quote byte or the record terminator.
    ///
    /// This is the default.
    Necessary,
    /// Put quotes around every field. Always.
    Always,
}

impl Default for QuoteStyle {
    fn default() -> QuoteStyle {
        QuoteStyle::Necessary
    }
}

/// Encodes fields for output under a fixed dialect.
///
/// This is the inverse of the reader's quoted-value decoding: for any
/// field, reading back the quoter's output under the same dialect
/// reproduces the field exactly. Fields that need no quoting are returned
/// unchanged, borrowed.
///
/// Converting between dialects is just a matter of building the quoter
/// from the *output* dialect and feeding it fields parsed under the input
/// dialect.
///
/// # Example
///
/// ```
/// use dsv::{Dialect, Quoter};
///
/// let quoter = Quoter::new(Dialect::default());
/// assert_eq!(&*quoter.quote(b"plain"), b"plain");
/// assert_eq!(&*quoter.quote(b"a,b"), b"\"a,b\"");
/// assert_eq!(&*quoter.quote(b"a\"b"), b"\"a\"\"b\"");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Quoter {
    dialect: Dialect,
    style: QuoteStyle,
}

impl Quoter {
    /// Create a new quoter for the given dialect, quoting only when
    /// necessary.
    pub fn new(dialect: Dialect) -> Quoter {
        Quoter { dialect, style: QuoteStyle::default() }
    }

    /// Create a new quoter for the given dialect and quoting style.
    pub fn with_style(dialect: Dialect, style: QuoteStyle) -> Quoter {
        Quoter { dialect, style }
    }

    /// Encode one field.
    ///
    /// When quoting is not required the input is returned unchanged.
    /// Otherwise the result is the quote byte, the field with every quote
    /// byte doubled, and the quote byte again.
    pub fn quote<'a>(&self, field: &'a [u8]) -> Cow<'a, [u8]> {
        if !self.needs_quotes(field) {
            return Cow::Borrowed(field);
        }
        let quote = self.dialect.quote();
        let mut out = Vec::with_capacity(field.len() + 2);
        out.push(quote);
        let mut rest = field;
        while let Some(i) = memchr(quote, rest) {
            out.extend_from_slice(&rest[..=i]);
            out.push(quote);
            rest = &rest[i + 1..];
        }
        out.extend_from_slice(rest);
        out.push(quote);
        Cow::Owned(out)
    }

    /// Re-encode every field of `record` in place, under this quoter's
    /// dialect and style.
    pub fn quote_record(&self, record: &mut Record) {
        let mut out = Record::with_capacity(0, record.len());
        for field in record.iter() {
            out.push_field(&self.quote(field));
        }
        mem::swap(record, &mut out);
    }

    fn needs_quotes(&self, field: &[u8]) -> bool {
        match self.style {
            QuoteStyle::Always => true,
            QuoteStyle::Necessary => memchr3(
                self.dialect.delimiter(),
                self.dialect.quote(),
                self.dialect.terminator(),
                field,
            )
            .is_some(),
        }
    }
}

/// A DSV writer.
///
/// This writer encodes records to an underlying `io::Write`, passing every
/// field through a [`Quoter`] and inserting the dialect's delimiter and
/// record terminator. A record given as an empty iterator is written as a
/// bare terminator, which reads back as a record with one empty field.
///
/// Note that a failed write may leave a partial record in the underlying
/// stream; as with parsing, there is no recovery.
///
/// # Example
///
/// ```
/// use dsv::{Dialect, Writer};
///
/// let mut wtr = Writer::new(Dialect::default(), vec![]);
/// wtr.write_record(&["a", "b,c"])?;
/// assert_eq!(wtr.into_inner(), b"a,\"b,c\"\n".to_vec());
/// # Ok::<(), dsv::Error>(())
/// ```
pub struct Writer<W> {
    wtr: W,
    quoter: Quoter,
}

impl<W: io::Write> Writer<W> {
    /// Create a new writer from a dialect and an `io::Write`, quoting only
    /// when necessary.
    pub fn new(dialect: Dialect, wtr: W) -> Writer<W> {
        Writer { wtr, quoter: Quoter::new(dialect) }
    }

    /// Create a new writer from a dialect, a quoting style and an
    /// `io::Write`.
    pub fn with_style(
        dialect: Dialect,
        style: QuoteStyle,
        wtr: W,
    ) -> Writer<W> {
        Writer { wtr, quoter: Quoter::with_style(dialect, style) }
    }

    /// Write one record, followed by the record terminator.
    pub fn write_record<I, T>(&mut self, record: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let delimiter = self.quoter.dialect.delimiter();
        let terminator = self.quoter.dialect.terminator();
        let mut first = true;
        for field in record {
            if !first {
                self.wtr.write_all(&[delimiter])?;
            }
            first = false;
            self.wtr.write_all(&self.quoter.quote(field.as_ref()))?;
        }
        self.wtr.write_all(&[terminator])?;
        Ok(())
    }

    /// Flush the underlying `io::Write`.
    pub fn flush(&mut self) -> io::Result<()> {
        self.wtr.flush()
    }

    /// Consume this writer, returning the underlying `io::Write`.
    pub fn into_inner(self) -> W {
        self.wtr
    }
}

impl Writer<BufWriter<File>> {
    /// Create a new writer from a dialect and a file path.
    pub fn from_path<P: AsRef<Path>>(
        dialect: Dialect,
        path: P,
    ) -> Result<Writer<BufWriter<File>>> {
        Ok(Writer::new(dialect, BufWriter::new(File::create(path)?)))
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use crate::dialect::Dialect;
    use crate::record::Record;

    use super::{QuoteStyle, Quoter, Writer};

    fn quoter() -> Quoter {
        Quoter::new(Dialect::default())
    }

    fn force_quoter() -> Quoter {
        Quoter::with_style(Dialect::default(), QuoteStyle::Always)
    }

    #[test]
    fn plain_field_is_borrowed_unchanged() {
        match quoter().quote(b"plain") {
            Cow::Borrowed(field) => assert_eq!(field, b"plain"),
            Cow::Owned(field) => panic!("unexpected copy: {:?}", field),
        }
    }

    #[test]
    fn empty_field_needs_no_quotes() {
        assert_eq!(&*quoter().quote(b""), b"");
    }

    #[test]
    fn delimiter_forces_quotes() {
        assert_eq!(&*quoter().quote(b"a,b"), b"\"a,b\"");
    }

    #[test]
    fn terminator_forces_quotes() {
        assert_eq!(&*quoter().quote(b"a\nb"), b"\"a\nb\"");
    }

    #[test]
    fn every_quote_is_doubled() {
        assert_eq!(&*quoter().quote(b"a\"b"), b"\"a\"\"b\"");
        assert_eq!(&*quoter().quote(b"\"\""), b"\"\"\"\"\"\"");
        assert_eq!(&*quoter().quote(b"\"a"), b"\"\"\"a\"");
        assert_eq!(&*quoter().quote(b"a\""), b"\"a\"\"\"");
    }

    #[test]
    fn always_quotes_clean_fields() {
        assert_eq!(&*force_quoter().quote(b"plain"), b"\"plain\"");
        assert_eq!(&*force_quoter().quote(b""), b"\"\"");
    }

    #[test]
    fn custom_quote_byte() {
        let quoter =
            Quoter::new(Dialect::new(b',', b'\'', b'\n').unwrap());
        assert_eq!(&*quoter.quote(b"it's"), b"'it''s'");
        assert_eq!(&*quoter.quote(b"a\"b"), b"a\"b");
    }

    #[test]
    fn quote_record_in_place() {
        let mut rec = Record::from(vec!["a", "b,c", "d\"e"]);
        quoter().quote_record(&mut rec);
        assert_eq!(rec, vec!["a", "\"b,c\"", "\"d\"\"e\""]);
    }

    #[test]
    fn force_quote_empty_record() {
        let mut rec = Record::from(vec![""]);
        force_quoter().quote_record(&mut rec);
        assert_eq!(rec, vec!["\"\""]);
    }

    #[test]
    fn write_records() {
        let mut wtr = Writer::new(Dialect::default(), vec![]);
        wtr.write_record(&["a", "b", "c"]).unwrap();
        wtr.write_record(&["x,y", "z"]).unwrap();
        assert_eq!(wtr.into_inner(), b"a,b,c\n\"x,y\",z\n".to_vec());
    }

    #[test]
    fn write_empty_record() {
        let mut wtr = Writer::new(Dialect::default(), vec![]);
        let no_fields: &[&[u8]] = &[];
        wtr.write_record(no_fields).unwrap();
        assert_eq!(wtr.into_inner(), b"\n".to_vec());
    }

    #[test]
    fn write_with_always_style() {
        let mut wtr = Writer::with_style(
            Dialect::default(),
            QuoteStyle::Always,
            vec![],
        );
        wtr.write_record(&["a", ""]).unwrap();
        assert_eq!(wtr.into_inner(), b"\"a\",\"\"\n".to_vec());
    }

    #[test]
    fn write_whole_record_type() {
        let rec = Record::from(vec!["a", "b\nc"]);
        let mut wtr = Writer::new(Dialect::default(), vec![]);
        wtr.write_record(&rec).unwrap();
        assert_eq!(wtr.into_inner(), b"a,\"b\nc\"\n".to_vec());
    }
}
