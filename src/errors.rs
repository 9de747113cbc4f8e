//! The error model.
//!
//! Parsing produces a `ParsingResult`, which is either a success or a single
//! `ParseFailure` of a known `ParseErrorKind`. Everything that can go wrong
//! outside of one parse call (configuration, verb registration) is reported
//! through the crate-wide `Error`.

use std::{fmt, result};

use crate::separators::SeparatorError;

/// The closed set of reasons a parse can fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// An option was given that nothing declares.
    OptionalArgumentNotFound,
    /// An option value was given in a way the dialect does not allow, e.g.
    /// `--name value` when only `--name=value` is accepted.
    OptionalArgumentSeparatorNotSupported,
    /// A short option name longer than one character, in a dialect without
    /// multi-character short options.
    MultiCharShortOptionalArgumentNotSupported,
    /// `-abc` where one of the stacked options does not take a boolean.
    ArgumentCombinationIsNotBoolean,
    /// An option value is missing or malformed.
    OptionalArgumentParseError,
    /// More positional arguments than declared slots.
    PositionalArgumentNotFound,
    /// A boolean option received something that is not a boolean literal.
    BooleanValueParseError,
    /// A dictionary item is not of the form `key=value`.
    DictionaryValueParseError,
}

impl ParseErrorKind {
    /// Whether this kind reports an undeclared option or positional.
    #[inline]
    pub fn is_not_found(self) -> bool {
        matches!(
            self,
            ParseErrorKind::OptionalArgumentNotFound | ParseErrorKind::PositionalArgumentNotFound
        )
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::ParseErrorKind::*;
        let s = match *self {
            OptionalArgumentNotFound => "unknown option",
            OptionalArgumentSeparatorNotSupported => "unsupported option value separator",
            MultiCharShortOptionalArgumentNotSupported => "multi-character short option",
            ArgumentCombinationIsNotBoolean => "non-boolean option in a combination",
            OptionalArgumentParseError => "invalid option value",
            PositionalArgumentNotFound => "unexpected positional argument",
            BooleanValueParseError => "invalid boolean value",
            DictionaryValueParseError => "invalid dictionary value",
        };
        f.write_str(s)
    }
}

/// One parse failure: a kind and a message for humans.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseFailure {
    pub kind:    ParseErrorKind,
    pub message: String,
}

impl ParseFailure {
    pub fn new(kind: ParseErrorKind, message: impl Into<String>) -> ParseFailure {
        ParseFailure {
            kind,
            message: message.into(),
        }
    }
}

/// The outcome of one parse call.
///
/// A failure always carries its message, a success never does.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[must_use]
pub struct ParsingResult(Option<ParseFailure>);

impl ParsingResult {
    pub const SUCCESS: ParsingResult = ParsingResult(None);

    pub fn failure(kind: ParseErrorKind, message: impl Into<String>) -> ParsingResult {
        ParsingResult(Some(ParseFailure::new(kind, message)))
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.0.is_none()
    }

    #[inline]
    pub fn error_kind(&self) -> Option<ParseErrorKind> {
        self.0.as_ref().map(|e| e.kind)
    }

    #[inline]
    pub fn error_message(&self) -> Option<&str> {
        self.0.as_ref().map(|e| &*e.message)
    }

    #[inline]
    pub fn as_failure(&self) -> Option<&ParseFailure> {
        self.0.as_ref()
    }

    /// Folds another result into this one.
    ///
    /// A success never replaces a failure, and a failure always replaces
    /// whatever came before it. So of two failures the *later* one is kept.
    pub fn combine(self, other: ParsingResult) -> ParsingResult {
        match other.0 {
            None => self,
            Some(_) => other,
        }
    }

    pub fn into_result(self) -> result::Result<(), ParseFailure> {
        match self.0 {
            None => Ok(()),
            Some(e) => Err(e),
        }
    }
}

impl From<ParseFailure> for ParsingResult {
    fn from(e: ParseFailure) -> ParsingResult {
        ParsingResult(Some(e))
    }
}

/// Represents the different types of errors.
///
/// In the common case a program only wants to report the problem and quit;
/// `Error::exit` does just that.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The argument vector could not be parsed.
    #[error("{0}")]
    Parse(#[from] ParseFailure),

    /// A separator set was invalid.
    #[error("invalid separators: {0}")]
    Separators(#[from] SeparatorError),

    /// A dialect name did not name any of the canned profiles.
    #[error("unknown command line style '{0}'")]
    UnknownStyle(String),

    /// Two handlers resolve to the same verb.
    #[error("the verb '{verb}' is registered more than once")]
    AmbiguousVerb { verb: String },

    /// No verb matched and there is no default handler.
    #[error("no handler matches the given command line")]
    NoHandler,
}

impl Error {
    /// The parse error kind, if this is a parse error.
    pub fn parse_kind(&self) -> Option<ParseErrorKind> {
        match *self {
            Error::Parse(ref e) => Some(e.kind),
            _ => None,
        }
    }

    /// Print this error to stderr and exit with status `1`.
    pub fn exit(&self) -> ! {
        eprintln!("{self}");
        std::process::exit(1)
    }
}

/// Short result type alias.
pub type Result<T> = result::Result<T, Error>;
