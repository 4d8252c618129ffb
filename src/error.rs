use std::error;
use std::fmt;
use std::io;
use std::result;

use bstr::BString;

/// A type alias for `Result<T, dsv::Error>`.
pub type Result<T> = result::Result<T, Error>;

/// An error that can occur when processing DSV data.
///
/// All parse errors are fatal to the record in progress: the reader never
/// resynchronizes or retries after reporting one. Whether the whole run
/// terminates is up to the caller, although stopping is the intended
/// default.
#[derive(Debug)]
pub enum Error {
    /// An I/O error that occurred while reading or writing DSV data.
    Io(io::Error),
    /// An invalid dialect configuration. This is always reported before any
    /// record is read.
    Config(ConfigError),
    /// A malformed record was found in the input.
    Parse(ParseError),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Error {
        Error::Config(err)
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            Error::Config(ref err) => Some(err),
            Error::Parse(ref err) => Some(err),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Io(ref err) => err.fmt(f),
            Error::Config(ref err) => err.fmt(f),
            Error::Parse(ref err) => err.fmt(f),
        }
    }
}

/// The role a byte plays in a dialect.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    /// The value separator between fields.
    Delimiter,
    /// The quote byte.
    Quote,
    /// The record terminator.
    Terminator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Role::Delimiter => write!(f, "delimiter"),
            Role::Quote => write!(f, "quote"),
            Role::Terminator => write!(f, "record terminator"),
        }
    }
}

/// An error that can occur when building a dialect.
///
/// A dialect is validated in full before any parsing begins, so this error
/// is never interleaved with parse errors.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// Two roles were assigned the same byte.
    Clash {
        /// The first of the two clashing roles.
        a: Role,
        /// The second of the two clashing roles.
        b: Role,
        /// The byte assigned to both.
        byte: u8,
    },
    /// The NUL byte was assigned to a role. NUL is unsupported anywhere in
    /// DSV data, delimiters included.
    Nul {
        /// The role NUL was assigned to.
        role: Role,
    },
}

impl error::Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ConfigError::Clash { a, b, byte } => write!(
                f,
                "DSV config error: the {} and the {} are both {:?}",
                a, b, byte as char,
            ),
            ConfigError::Nul { role } => write!(
                f,
                "DSV config error: the NUL byte cannot be used as the {}",
                role,
            ),
        }
    }
}

/// A parse error, with the position at which it was found.
///
/// All counters are 1-based. The line is the physical input line being
/// scanned when the error was found, which for a quoted value spanning
/// several lines is the last line pulled.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseError {
    record: u64,
    line: u64,
    field: u64,
    kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(
        record: u64,
        line: u64,
        field: u64,
        kind: ParseErrorKind,
    ) -> ParseError {
        ParseError { record, line, field, kind }
    }

    /// The index of the record in which this error occurred.
    pub fn record(&self) -> u64 {
        self.record
    }

    /// The physical input line at which this error occurred.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// The index of the field in which this error occurred.
    pub fn field(&self) -> u64 {
        self.field
    }

    /// The specific kind of parse error.
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// Consume this error, returning its kind.
    pub fn into_kind(self) -> ParseErrorKind {
        self.kind
    }
}

impl error::Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "DSV parse error: record {} (line {}, field {}): {}",
            self.record, self.line, self.field, self.kind,
        )
    }
}

/// The specific kind of parse error that occurred.
///
/// Each kind carries enough of the offending input to diagnose it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseErrorKind {
    /// A quoted value's closing quote was never found before the end of
    /// the input.
    UnclosedQuote {
        /// The value accumulated up to the end of the input.
        partial: BString,
    },
    /// A byte other than the delimiter immediately followed a quoted
    /// value's closing quote.
    ExpectedDelimiter {
        /// The byte that was found instead.
        found: u8,
    },
    /// A quote byte appeared inside an unquoted value.
    QuoteInUnquotedValue,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ParseErrorKind::UnclosedQuote { ref partial } => write!(
                f,
                "quoted value is never closed before end of input \
                 (partial value: {:?})",
                partial,
            ),
            ParseErrorKind::ExpectedDelimiter { found } => write!(
                f,
                "expected delimiter after closing quote, found {:?}",
                found as char,
            ),
            ParseErrorKind::QuoteInUnquotedValue => {
                write!(f, "unquoted value contains a quote byte")
            }
        }
    }
}
