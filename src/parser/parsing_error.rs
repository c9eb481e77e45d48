//! Error types for the low-level line/field parser.
//!
//! This module provides [ParsingError] and [ParsingErrorType] for representing
//! and reporting errors that occur while splitting SWC text into fields.
//! Higher-level errors (topology, tags) are reported as
//! [SwcError](crate::swc::SwcError), which wraps these.

use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use std::error::Error;
use std::fmt;

/// Default length of context provided by error from parser
const DEFAULT_CONTEXT_LENGTH: usize = 50;

// =#========================================================================#=
// PARSING ERROR TYPE
// =#========================================================================€=
/// Error types that can occur while reading fields of a record.
#[derive(PartialEq, Debug, Clone)]
pub enum ParsingErrorType {
    IoError(String),
    MissingField(&'static str),
    TrailingField(String),
    InvalidInteger { field: &'static str, value: String },
    InvalidReal { field: &'static str, value: String },
    NegativeId(i64),
    NegativeRadius(f64),
    InvalidEncoding,
}

impl fmt::Display for ParsingErrorType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParsingErrorType::IoError(msg) => write!(f, "IO error - {msg}"),
            ParsingErrorType::MissingField(field) => write!(f, "Missing field '{field}'"),
            ParsingErrorType::TrailingField(value) => {
                write!(f, "Unexpected trailing field '{value}'")
            }
            ParsingErrorType::InvalidInteger { field, value } => {
                write!(f, "Field '{field}' is not an integer: '{value}'")
            }
            ParsingErrorType::InvalidReal { field, value } => {
                write!(f, "Field '{field}' is not a finite number: '{value}'")
            }
            ParsingErrorType::NegativeId(id) => write!(f, "Negative sample id {id}"),
            ParsingErrorType::NegativeRadius(r) => write!(f, "Negative radius {r}"),
            ParsingErrorType::InvalidEncoding => write!(f, "Invalid (non-ASCII) field"),
        }
    }
}

// =#========================================================================#=
// PARSING ERROR
// =#========================================================================$=
/// Parsing error with contextual information (line and surrounding bytes).
#[derive(Debug, Clone, PartialEq)]
pub struct ParsingError {
    kind: ParsingErrorType,
    position: usize,
    line: usize,
    context: String,
}

impl ParsingError {
    /// Create a ParsingError from an error type and parser state
    pub fn from_parser<S: ByteSource>(kind: ParsingErrorType, parser: &mut ByteParser<S>) -> Self {
        Self {
            kind,
            position: parser.position(),
            line: parser.line(),
            context: parser.current_line(DEFAULT_CONTEXT_LENGTH),
        }
    }

    /// Convenience constructor for MissingField
    pub fn missing_field<S: ByteSource>(parser: &mut ByteParser<S>, field: &'static str) -> Self {
        Self::from_parser(ParsingErrorType::MissingField(field), parser)
    }

    /// Convenience constructor for TrailingField
    pub fn trailing_field<S: ByteSource>(parser: &mut ByteParser<S>, field: String) -> Self {
        Self::from_parser(ParsingErrorType::TrailingField(field), parser)
    }

    /// Convenience constructor for InvalidInteger
    pub fn invalid_integer<S: ByteSource>(
        parser: &mut ByteParser<S>,
        field: &'static str,
        value: String,
    ) -> Self {
        Self::from_parser(ParsingErrorType::InvalidInteger { field, value }, parser)
    }

    /// Convenience constructor for InvalidReal
    pub fn invalid_real<S: ByteSource>(
        parser: &mut ByteParser<S>,
        field: &'static str,
        value: String,
    ) -> Self {
        Self::from_parser(ParsingErrorType::InvalidReal { field, value }, parser)
    }

    /// Convenience constructor for NegativeId
    pub fn negative_id<S: ByteSource>(parser: &mut ByteParser<S>, id: i64) -> Self {
        Self::from_parser(ParsingErrorType::NegativeId(id), parser)
    }

    /// Convenience constructor for NegativeRadius
    pub fn negative_radius<S: ByteSource>(parser: &mut ByteParser<S>, radius: f64) -> Self {
        Self::from_parser(ParsingErrorType::NegativeRadius(radius), parser)
    }

    /// Convenience constructor for InvalidEncoding
    pub fn invalid_encoding<S: ByteSource>(parser: &mut ByteParser<S>) -> Self {
        Self::from_parser(ParsingErrorType::InvalidEncoding, parser)
    }

    /// Get the error kind
    pub fn kind(&self) -> &ParsingErrorType {
        &self.kind
    }

    /// Get the byte position where the error occurred
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get the (1-based) line where the error occurred; 0 if unknown
    pub fn line(&self) -> usize {
        self.line
    }

    /// Get the text of the line the error occurred on
    pub fn context(&self) -> &str {
        &self.context
    }
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if self.line > 0 {
            write!(f, " on line {}", self.line)?;
        }

        if !self.context.is_empty() {
            write!(f, "\n  Context: {}", self.context)?;
        }

        Ok(())
    }
}

impl Error for ParsingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl From<std::io::Error> for ParsingError {
    fn from(err: std::io::Error) -> Self {
        ParsingError {
            kind: ParsingErrorType::IoError(err.to_string()),
            position: 0,
            line: 0,
            context: String::new(),
        }
    }
}
