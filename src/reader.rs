use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use memchr::{memchr, memchr2};

use crate::dialect::Dialect;
use crate::error::{Error, ParseError, ParseErrorKind, Result};
use crate::record::Record;

/// The position of a reader in its input.
///
/// Both counters are 1-based and zero before anything has been read. The
/// record counter advances once per record; the line counter advances once
/// per physical input line, so a record containing a quoted value that
/// spans lines advances it more than once.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Position {
    record: u64,
    line: u64,
}

impl Position {
    /// The index of the record being (or last) read.
    pub fn record(&self) -> u64 {
        self.record
    }

    /// The number of physical input lines consumed so far.
    pub fn line(&self) -> u64 {
        self.line
    }
}

/// A DSV reader.
///
/// This reader pulls one record at a time from an underlying stream and
/// splits it into fields according to a [`Dialect`], following the RFC 4180
/// quoting discipline generalized to arbitrary single-byte delimiters:
///
/// * a value containing the delimiter, the quote byte or the record
///   terminator must be quoted;
/// * inside a quoted value, the quote byte escapes itself by doubling;
/// * a quoted value may contain the record terminator, in which case the
///   reader keeps pulling physical lines until the closing quote is found.
///
/// Unlike most permissive CSV parsers, this reader is strict: a quote byte
/// inside an unquoted value, a closing quote followed by anything other
/// than the delimiter, and a quoted value left open at end of input are all
/// hard errors. There is no recovery; parsing stops at the first malformed
/// record.
///
/// # Example
///
/// ```
/// use dsv::{Dialect, Reader, Record};
///
/// let data = "\
/// sticker,mortals,7
/// bribed,\"personae,poncing\",7
/// ";
/// let mut rdr = Reader::from_reader(Dialect::default(), data.as_bytes());
/// let mut rec = Record::new();
///
/// assert!(rdr.read_record(&mut rec)?);
/// assert_eq!(rec, vec!["sticker", "mortals", "7"]);
/// assert!(rdr.read_record(&mut rec)?);
/// assert_eq!(rec, vec!["bribed", "personae,poncing", "7"]);
/// assert!(!rdr.read_record(&mut rec)?);
/// # Ok::<(), dsv::Error>(())
/// ```
pub struct Reader<R> {
    rdr: R,
    dialect: Dialect,
    /// The raw text of the record in progress, physical lines spliced
    /// together with the terminator byte, terminator at the end stripped.
    buf: Vec<u8>,
    /// Scratch space for assembling a quoted field.
    field: Vec<u8>,
    /// 1-based index of the record in progress.
    record: u64,
    /// Number of physical lines consumed so far.
    line: u64,
}

impl<R: BufRead> Reader<R> {
    /// Create a new reader from a dialect and a buffered stream.
    pub fn new(dialect: Dialect, rdr: R) -> Reader<R> {
        Reader {
            rdr,
            dialect,
            buf: Vec::with_capacity(1024),
            field: Vec::new(),
            record: 0,
            line: 0,
        }
    }

    /// The dialect this reader parses with.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The current position of this reader in its input.
    pub fn position(&self) -> Position {
        Position { record: self.record, line: self.line }
    }

    /// Read the next record into `rec`, overwriting its previous contents.
    ///
    /// Returns `Ok(false)` when the end of the input is reached before a
    /// record is started; `rec` is left cleared in that case. A successful
    /// read always produces at least one field: an empty input line is a
    /// record with one empty field.
    pub fn read_record(&mut self, rec: &mut Record) -> Result<bool> {
        rec.clear();
        self.buf.clear();
        if !self.pull_line()? {
            return Ok(false);
        }
        self.record += 1;
        self.split_record(rec)?;
        Ok(true)
    }

    /// Returns an iterator over all remaining records, yielding owned
    /// copies.
    ///
    /// The iterator stops after yielding an error, since every error is
    /// fatal to the parse.
    pub fn records(&mut self) -> Records<R> {
        Records { rdr: self, rec: Record::new(), done: false }
    }

    /// Pull one physical line from the underlying stream onto the end of
    /// `self.buf`, stripping the trailing terminator if present. Returns
    /// false at end of input with nothing read.
    fn pull_line(&mut self) -> Result<bool> {
        let terminator = self.dialect.terminator();
        let n = self.rdr.read_until(terminator, &mut self.buf)?;
        if n == 0 {
            return Ok(false);
        }
        self.line += 1;
        if self.buf.last() == Some(&terminator) {
            self.buf.pop();
        }
        Ok(true)
    }

    /// Split the buffered record text into fields, pulling more lines when
    /// a quoted value runs past the current one.
    fn split_record(&mut self, rec: &mut Record) -> Result<()> {
        let delimiter = self.dialect.delimiter();
        let quote = self.dialect.quote();
        let mut pos = 0;
        // Invariant: `pos` is at the start of a field.
        loop {
            let rest = &self.buf[pos..];
            if rest.is_empty() {
                rec.push_field(&[]);
                return Ok(());
            }
            if rest[0] == quote {
                match self.quoted_field(pos, rec)? {
                    Some(next) => pos = next,
                    None => return Ok(()),
                }
            } else {
                match memchr2(delimiter, quote, rest) {
                    Some(i) if rest[i] == quote => {
                        return Err(self.parse_error(
                            rec,
                            ParseErrorKind::QuoteInUnquotedValue,
                        ));
                    }
                    Some(i) => {
                        rec.push_field(&rest[..i]);
                        pos += i + 1;
                    }
                    None => {
                        rec.push_field(rest);
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Parse one quoted field starting at `pos` (which holds the opening
    /// quote). On success the field is pushed onto `rec` and the position
    /// just past the following delimiter is returned, or `None` if the
    /// record is complete.
    fn quoted_field(
        &mut self,
        pos: usize,
        rec: &mut Record,
    ) -> Result<Option<usize>> {
        let delimiter = self.dialect.delimiter();
        let quote = self.dialect.quote();
        self.field.clear();
        let mut i = pos + 1;
        loop {
            let j = match memchr(quote, &self.buf[i..]) {
                Some(offset) => i + offset,
                None => {
                    // The quoted value runs past this physical line. Splice
                    // the terminator and the next line onto the tail and
                    // rescan, so an escape pair is still detected when its
                    // first half was the last byte scanned.
                    let spliced = self.buf.len();
                    self.buf.push(self.dialect.terminator());
                    if !self.pull_line()? {
                        self.buf.truncate(spliced);
                        let mut partial = self.field.clone();
                        partial.extend_from_slice(&self.buf[i..]);
                        return Err(self.parse_error(
                            rec,
                            ParseErrorKind::UnclosedQuote {
                                partial: partial.into(),
                            },
                        ));
                    }
                    continue;
                }
            };
            if self.buf.get(j + 1) == Some(&quote) {
                // An escape pair: exactly one quote byte is appended,
                // two are consumed.
                self.field.extend_from_slice(&self.buf[i..=j]);
                i = j + 2;
                continue;
            }
            // A true closing quote.
            self.field.extend_from_slice(&self.buf[i..j]);
            let next = match self.buf.get(j + 1) {
                None => None,
                Some(&b) if b == delimiter => Some(j + 2),
                Some(&b) => {
                    return Err(self.parse_error(
                        rec,
                        ParseErrorKind::ExpectedDelimiter { found: b },
                    ));
                }
            };
            rec.push_field(&self.field);
            return Ok(next);
        }
    }

    fn parse_error(&self, rec: &Record, kind: ParseErrorKind) -> Error {
        Error::Parse(ParseError::new(
            self.record,
            self.line,
            rec.len() as u64 + 1,
            kind,
        ))
    }
}

impl<R: io::Read> Reader<BufReader<R>> {
    /// Create a new reader from a dialect and an arbitrary `io::Read`.
    ///
    /// The stream is buffered for you automatically.
    pub fn from_reader(dialect: Dialect, rdr: R) -> Reader<BufReader<R>> {
        Reader::new(dialect, BufReader::new(rdr))
    }
}

impl Reader<BufReader<File>> {
    /// Create a new reader from a dialect and a file path.
    pub fn from_path<P: AsRef<Path>>(
        dialect: Dialect,
        path: P,
    ) -> Result<Reader<BufReader<File>>> {
        Ok(Reader::from_reader(dialect, File::open(path)?))
    }
}

/// An iterator over the records of a reader.
///
/// The lifetime parameter `'r` refers to the lifetime of the underlying
/// reader.
pub struct Records<'r, R> {
    rdr: &'r mut Reader<R>,
    rec: Record,
    done: bool,
}

impl<'r, R: BufRead> Iterator for Records<'r, R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Result<Record>> {
        if self.done {
            return None;
        }
        match self.rdr.read_record(&mut self.rec) {
            Ok(true) => Some(Ok(self.rec.clone())),
            Ok(false) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
