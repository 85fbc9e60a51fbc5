//! Error types for TOON encoding and decoding.
//!
//! The codec has two independent error types, matching the two directions of
//! the conversion: [`EncodeError`] for turning a value into text,
//! [`DecodeError`] for turning text back into a value. Keeping them separate
//! means callers match only the variants that are actually reachable from
//! the function they called, instead of a single grab-bag enum.
//!
//! ## Examples
//!
//! ```rust
//! use serde_toon::{decode, DecodeOptions};
//!
//! let result = decode("invalid: [malformed", &DecodeOptions::default());
//! assert!(result.is_err());
//! ```

use std::fmt;
use thiserror::Error;

/// Errors raised while turning a [`crate::Value`] (or a `Serialize` type) into TOON text.
#[derive(Debug, Clone, Error)]
pub enum EncodeError {
    /// An `EncodeOptions` record failed validation before encoding began.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// A native value had no path into the `Value` tree (no normalization
    /// adapter, not a recognized serde shape).
    #[error("unsupported value: {message} ({value})")]
    UnsupportedValue { message: String, value: String },

    /// Normalization could not produce a valid `Value` (reserved for
    /// adapter-driven failures; the built-in normalizer never fails).
    #[error("normalization failure: {0}")]
    NormalizationFailure(String),
}

impl EncodeError {
    #[must_use]
    pub fn invalid_options<T: fmt::Display>(msg: T) -> Self {
        EncodeError::InvalidOptions(msg.to_string())
    }

    #[must_use]
    pub fn unsupported_value<T: fmt::Display>(message: T, value: impl fmt::Debug) -> Self {
        EncodeError::UnsupportedValue {
            message: message.to_string(),
            value: format!("{value:?}"),
        }
    }
}

impl serde::ser::Error for EncodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        EncodeError::NormalizationFailure(msg.to_string())
    }
}

/// Which of the decoder's fatal conditions produced a [`DecodeError`].
///
/// Lets callers match on the failure category without parsing `message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    InvalidOptions,
    IndentationViolation,
    ArrayLengthMismatch,
    RowWidthMismatch,
    UnterminatedString,
    InvalidEscape,
    MalformedHeader,
    PathConflict,
    BlankLineInArray,
    ParseFailure,
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DecodeErrorKind::InvalidOptions => "invalid options",
            DecodeErrorKind::IndentationViolation => "indentation violation",
            DecodeErrorKind::ArrayLengthMismatch => "array length mismatch",
            DecodeErrorKind::RowWidthMismatch => "row width mismatch",
            DecodeErrorKind::UnterminatedString => "unterminated string",
            DecodeErrorKind::InvalidEscape => "invalid escape",
            DecodeErrorKind::MalformedHeader => "malformed header",
            DecodeErrorKind::PathConflict => "path expansion conflict",
            DecodeErrorKind::BlankLineInArray => "blank line in array body",
            DecodeErrorKind::ParseFailure => "parse failure",
        };
        f.write_str(s)
    }
}

/// A fatal decode-time error. The decoder never attempts recovery, so
/// there is always exactly one of these per failed call, carrying the
/// 1-based source line and a short snippet of the offending text.
#[derive(Debug, Clone, Error)]
#[error("{kind} at line {line}: {message}{}", snippet_suffix(snippet))]
pub struct DecodeError {
    pub kind: DecodeErrorKind,
    pub message: String,
    pub line: usize,
    pub snippet: String,
}

fn snippet_suffix(snippet: &str) -> String {
    if snippet.is_empty() {
        String::new()
    } else {
        format!("\n  {snippet}")
    }
}

impl DecodeError {
    #[must_use]
    pub fn new(kind: DecodeErrorKind, line: usize, message: impl Into<String>) -> Self {
        DecodeError {
            kind,
            message: message.into(),
            line,
            snippet: String::new(),
        }
    }

    #[must_use]
    pub fn with_snippet(
        kind: DecodeErrorKind,
        line: usize,
        message: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        DecodeError {
            kind,
            message: message.into(),
            line,
            snippet: snippet.into(),
        }
    }
}

impl serde::de::Error for DecodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        DecodeError::new(DecodeErrorKind::ParseFailure, 0, msg.to_string())
    }
}

pub type EncodeResult<T> = std::result::Result<T, EncodeError>;
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;
