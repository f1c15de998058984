use std::fmt;

#[derive(Debug)]
#[cfg_attr(test, derive(PartialEq))]
pub(crate) enum Repr {
    Json(Box<str>),

    EmptyName,
    InvalidNameCharacter(usize),
    InvalidUrlCharacter(usize),

    TrailingCharactersAfterMember(usize),
    TrailingComma(usize),
    TrailingCharactersAfterParsedValue(usize),

    ExpectedInnerListDelimiter(usize),
    UnterminatedInnerList(usize),

    ExpectedStartOfBareItem(usize),

    ExpectedBoolean(usize),

    InvalidStringCharacter(usize),
    UnterminatedString(usize),

    UnterminatedEscapeSequence(usize),
    InvalidEscapeSequence(usize),

    UnterminatedByteSequence(usize),
    InvalidByteSequence(usize),

    ExpectedDigit(usize),
    TooManyDigits(usize),
    TooManyDigitsBeforeDecimalPoint(usize),
    TooManyDigitsAfterDecimalPoint(usize),
    TrailingDecimalPoint(usize),

    ExpectedStartOfKey(usize),
}

impl Repr {
    fn kind(&self) -> ErrorKind {
        match *self {
            Self::Json(_) => ErrorKind::Json,
            Self::EmptyName | Self::InvalidNameCharacter(_) | Self::InvalidUrlCharacter(_) => {
                ErrorKind::Encode
            }
            _ => ErrorKind::Parse,
        }
    }
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (msg, index) = match *self {
            Self::Json(ref msg) => return write!(f, "invalid JSON: {msg}"),

            Self::EmptyName => return f.write_str("endpoint name cannot be empty"),
            Self::InvalidNameCharacter(i) => ("invalid character for endpoint name", i),
            Self::InvalidUrlCharacter(i) => ("invalid character for endpoint URL", i),

            Self::TrailingCharactersAfterMember(i) => ("trailing characters after member", i),
            Self::TrailingComma(i) => ("trailing comma", i),
            Self::TrailingCharactersAfterParsedValue(i) => {
                ("trailing characters after parsed value", i)
            }

            Self::ExpectedInnerListDelimiter(i) => {
                ("expected inner list delimiter (' ' or ')')", i)
            }
            Self::UnterminatedInnerList(i) => ("unterminated inner list", i),

            Self::ExpectedStartOfBareItem(i) => ("expected start of bare item", i),

            Self::ExpectedBoolean(i) => ("expected boolean ('0' or '1')", i),

            Self::InvalidStringCharacter(i) => ("invalid string character", i),
            Self::UnterminatedString(i) => ("unterminated string", i),

            Self::UnterminatedEscapeSequence(i) => ("unterminated escape sequence", i),
            Self::InvalidEscapeSequence(i) => ("invalid escape sequence", i),

            Self::UnterminatedByteSequence(i) => ("unterminated byte sequence", i),
            Self::InvalidByteSequence(i) => ("invalid byte sequence", i),

            Self::ExpectedDigit(i) => ("expected digit", i),
            Self::TooManyDigits(i) => ("too many digits", i),
            Self::TooManyDigitsBeforeDecimalPoint(i) => ("too many digits before decimal point", i),
            Self::TooManyDigitsAfterDecimalPoint(i) => ("too many digits after decimal point", i),
            Self::TrailingDecimalPoint(i) => ("trailing decimal point", i),

            Self::ExpectedStartOfKey(i) => ("expected start of key ('a'-'z' or '*')", i),
        };

        write!(f, "{msg} at index {index}")
    }
}

/// The category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An endpoint name or URL cannot be represented in a
    /// `Reporting-Endpoints` header.
    ///
    /// The header must not be emitted at all in this case.
    Encode,
    /// A `Reporting-Endpoints` header is not a valid structured-field
    /// dictionary.
    Parse,
    /// A `Report-To` header or a report payload is not valid JSON.
    Json,
}

/// An error that can occur in this crate.
///
/// Encoding functions return either a complete header value or an error,
/// never partial output. Use [`Error::kind`] to tell encoding failures apart
/// from malformed input.
#[derive(Debug)]
#[cfg_attr(test, derive(PartialEq))]
pub struct Error {
    repr: Repr,
}

impl Error {
    /// Returns the category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.repr.kind()
    }
}

impl From<Repr> for Error {
    fn from(repr: Repr) -> Self {
        Self { repr }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Repr::Json(err.to_string().into()).into()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.repr, f)
    }
}

impl std::error::Error for Error {}
