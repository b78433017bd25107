//! Two-layer error taxonomy: `BasicParseErrorKind` covers every failure the
//! core itself can raise; `ParseError<E>` adds a host extension's own error
//! type and a source location; `RuleParseError<E>` additionally keeps the
//! input slice that produced the error, for diagnostics.

use crate::location::Location;
use crate::tokenizer::Token;
use std::fmt;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum BasicParseErrorKind {
    #[error("unexpected token: {0:?}")]
    UnexpectedToken(Token),
    #[error("unexpected end of input")]
    EndOfInput,
    #[error("invalid at-rule prelude: @{0}")]
    AtRuleInvalid(String),
    #[error("invalid at-rule body")]
    AtRuleBodyInvalid,
    #[error("invalid qualified rule (selector list rejected)")]
    QualifiedRuleInvalid,
    #[error("extra input after a value that should have been exhausted")]
    ExtraInput,
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ParseErrorKind<E> {
    #[error(transparent)]
    Basic(#[from] BasicParseErrorKind),
    #[error("custom error: {0:?}")]
    Custom(E),
}

/// An error produced while parsing one production, at one location.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{kind} at {location}")]
pub struct ParseError<E> {
    pub kind: ParseErrorKind<E>,
    pub location: Location,
}

impl<E> ParseError<E> {
    pub fn basic(kind: BasicParseErrorKind, location: Location) -> Self {
        ParseError {
            kind: ParseErrorKind::Basic(kind),
            location,
        }
    }

    pub fn custom(err: E, location: Location) -> Self {
        ParseError {
            kind: ParseErrorKind::Custom(err),
            location,
        }
    }
}

/// Same as `ParseError`, plus the raw slice of the offending construct, for
/// tooling that wants to show the user what it rejected.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{inner}")]
pub struct RuleParseError<E> {
    pub inner: ParseError<E>,
    pub slice: String,
}

/// A host extension's own error type, type-erased. The extension contract
/// (spec §6.2) only ever needs to carry the error back out to the caller
/// that registered the extension, never to inspect it generically inside
/// the core, so a single boxed trait object stands in for full generic
/// parameterization of every parser function over `E`.
pub type CustomError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type threaded through this crate's own parser functions.
pub type Error = ParseError<CustomError>;
pub type PResult<T> = Result<T, Error>;

/// A recoverable error as reported through the error channel: location,
/// kind, and (when available) the source slice it applies to.
#[derive(Clone, Debug, PartialEq)]
pub struct ContextualError {
    pub location: Location,
    pub message: String,
    pub slice: Option<String>,
}

impl fmt::Display for ContextualError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.location)
    }
}

/// Append-only collector of recoverable parse errors, in source order.
///
/// The stylesheet loop and the block-body loop catch every error internally
/// and push it here rather than aborting (spec §4.11); the strict one-shot
/// entry points (`parse_one_rule`, `parse_one_value`, ...) bypass this and
/// return the first error directly instead.
#[derive(Clone, Debug, Default)]
pub struct ErrorChannel {
    errors: Vec<ContextualError>,
}

impl ErrorChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, location: Location, message: impl Into<String>, slice: Option<String>) {
        let message = message.into();
        log::debug!("recoverable parse error recorded: {message} at {location}");
        self.errors.push(ContextualError {
            location,
            message,
            slice,
        });
    }

    pub fn errors(&self) -> &[ContextualError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}
