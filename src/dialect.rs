use crate::error::{ConfigError, Role};

/// A validated set of DSV delimiters.
///
/// A dialect names the three single bytes that structure DSV data: the
/// delimiter between fields, the quote byte and the record terminator.
/// Since this crate is encoding agnostic, each is a single byte rather than
/// a codepoint; callers probably want to stick to the ASCII subset
/// (`<= 0x7F`).
///
/// The three bytes are guaranteed pairwise distinct and non-NUL. A dialect
/// can only be obtained through [`Dialect::new`], [`DialectBuilder`] or
/// `Dialect::default`, all of which enforce this, so parsing never begins
/// under an invalid configuration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Dialect {
    delimiter: u8,
    quote: u8,
    terminator: u8,
}

impl Default for Dialect {
    fn default() -> Dialect {
        Dialect { delimiter: b',', quote: b'"', terminator: b'\n' }
    }
}

impl Dialect {
    /// Build a dialect from the three delimiter bytes, validating them.
    ///
    /// This is shorthand for a [`DialectBuilder`] with every knob set.
    pub fn new(
        delimiter: u8,
        quote: u8,
        terminator: u8,
    ) -> Result<Dialect, ConfigError> {
        DialectBuilder::new()
            .delimiter(delimiter)
            .quote(quote)
            .terminator(terminator)
            .build()
    }

    /// The byte that separates fields within a record.
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// The byte that opens and closes a quoted value, and escapes itself
    /// by doubling.
    pub fn quote(&self) -> u8 {
        self.quote
    }

    /// The byte that terminates a record.
    pub fn terminator(&self) -> u8 {
        self.terminator
    }
}

/// Builds a dialect with various configuration knobs.
///
/// Validation happens once, in [`DialectBuilder::build`]; the setters never
/// fail.
///
/// # Example
///
/// ```
/// use dsv::DialectBuilder;
///
/// let tsv = DialectBuilder::new().delimiter(b'\t').build().unwrap();
/// assert_eq!(tsv.delimiter(), b'\t');
/// assert_eq!(tsv.quote(), b'"');
/// ```
#[derive(Debug, Default)]
pub struct DialectBuilder {
    dialect: Dialect,
}

impl DialectBuilder {
    /// Create a new builder with the default dialect: comma delimited,
    /// double quoted, line feed terminated.
    pub fn new() -> DialectBuilder {
        DialectBuilder::default()
    }

    /// The field delimiter to use.
    ///
    /// The default is `b','`.
    pub fn delimiter(&mut self, delimiter: u8) -> &mut DialectBuilder {
        self.dialect.delimiter = delimiter;
        self
    }

    /// The quote byte to use.
    ///
    /// The default is `b'"'`.
    pub fn quote(&mut self, quote: u8) -> &mut DialectBuilder {
        self.dialect.quote = quote;
        self
    }

    /// The record terminator to use.
    ///
    /// The terminator is a single byte; the default is `b'\n'`. There is no
    /// special treatment of `\r\n`: when reading CRLF-delimited input with
    /// a `b'\n'` terminator, the trailing `\r` stays in the last field and
    /// stripping it is a caller concern.
    pub fn terminator(&mut self, terminator: u8) -> &mut DialectBuilder {
        self.dialect.terminator = terminator;
        self
    }

    /// A convenience method for ASCII delimited text.
    ///
    /// This sets the delimiter and record terminator to the ASCII unit
    /// separator (`\x1F`) and record separator (`\x1E`), respectively.
    pub fn ascii(&mut self) -> &mut DialectBuilder {
        self.delimiter(b'\x1F').terminator(b'\x1E')
    }

    /// Validate the configured bytes and build the dialect.
    ///
    /// Fails if any byte is NUL or if two roles were assigned the same
    /// byte.
    pub fn build(&self) -> Result<Dialect, ConfigError> {
        let roles = [
            (Role::Delimiter, self.dialect.delimiter),
            (Role::Quote, self.dialect.quote),
            (Role::Terminator, self.dialect.terminator),
        ];
        for &(role, byte) in &roles {
            if byte == b'\x00' {
                return Err(ConfigError::Nul { role });
            }
        }
        for i in 0..roles.len() {
            for j in i + 1..roles.len() {
                if roles[i].1 == roles[j].1 {
                    return Err(ConfigError::Clash {
                        a: roles[i].0,
                        b: roles[j].0,
                        byte: roles[i].1,
                    });
                }
            }
        }
        Ok(self.dialect)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{ConfigError, Role};

    use super::{Dialect, DialectBuilder};

    #[test]
    fn default_is_csv() {
        let dialect = Dialect::default();
        assert_eq!(dialect.delimiter(), b',');
        assert_eq!(dialect.quote(), b'"');
        assert_eq!(dialect.terminator(), b'\n');
    }

    #[test]
    fn custom_bytes() {
        let dialect = Dialect::new(b';', b'\'', b'|').unwrap();
        assert_eq!(dialect.delimiter(), b';');
        assert_eq!(dialect.quote(), b'\'');
        assert_eq!(dialect.terminator(), b'|');
    }

    #[test]
    fn ascii_delimited() {
        let dialect = DialectBuilder::new().ascii().build().unwrap();
        assert_eq!(dialect.delimiter(), b'\x1F');
        assert_eq!(dialect.terminator(), b'\x1E');
    }

    #[test]
    fn delimiter_equals_quote() {
        let err = Dialect::new(b'"', b'"', b'\n').unwrap_err();
        assert_eq!(
            err,
            ConfigError::Clash {
                a: Role::Delimiter,
                b: Role::Quote,
                byte: b'"',
            },
        );
    }

    #[test]
    fn quote_equals_terminator() {
        let err =
            DialectBuilder::new().quote(b'\n').build().unwrap_err();
        assert_eq!(
            err,
            ConfigError::Clash {
                a: Role::Quote,
                b: Role::Terminator,
                byte: b'\n',
            },
        );
    }

    #[test]
    fn nul_delimiter() {
        let err = Dialect::new(b'\x00', b'"', b'\n').unwrap_err();
        assert_eq!(err, ConfigError::Nul { role: Role::Delimiter });
    }
}
