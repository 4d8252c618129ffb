/*!
The `dsv` crate reads and writes delimiter-separated values: CSV, TSV and
any variant built from a single-byte delimiter, quote byte and record
terminator.

The quoting discipline is the one from
[RFC 4180](https://tools.ietf.org/html/rfc4180), generalized to arbitrary
delimiters: a value containing the delimiter, the quote byte or the record
terminator is wrapped in quotes, and a quote byte inside a quoted value is
escaped by doubling it. Quoted values may span physical lines; the reader
keeps pulling input until the closing quote is found.

Unlike parsers that try to find *a* parse for any input, this crate is
strict and fail-fast: malformed input (an unclosed quote, a stray byte
after a closing quote, a quote inside an unquoted value) stops parsing with
a typed error that says where and why. There is no recovery mode.

Everything operates on raw bytes. No encoding is assumed beyond the
delimiters themselves; the NUL byte is unsupported anywhere.

# Example: converting between dialects

Read tab-separated input and re-emit it comma-separated:

```
use dsv::{Dialect, DialectBuilder, Reader, Record, Writer};

# fn main() -> dsv::Result<()> {
let tsv = DialectBuilder::new().delimiter(b'\t').build()?;
let csv = Dialect::default();

let mut rdr = Reader::from_reader(tsv, &b"a\tb,c\td\n"[..]);
let mut wtr = Writer::new(csv, vec![]);
let mut rec = Record::new();
while rdr.read_record(&mut rec)? {
    wtr.write_record(&rec)?;
}
assert_eq!(wtr.into_inner(), b"a,\"b,c\",d\n".to_vec());
# Ok(())
# }
```
*/

#![deny(missing_docs)]

pub use crate::dialect::{Dialect, DialectBuilder};
pub use crate::error::{
    ConfigError, Error, ParseError, ParseErrorKind, Result, Role,
};
pub use crate::reader::{Position, Reader, Records};
pub use crate::record::{Record, RecordIter};
pub use crate::writer::{QuoteStyle, Quoter, Writer};

mod dialect;
mod error;
mod reader;
mod record;
mod writer;
