//! Errors raised while reading SWC samples and converting them into a
//! [SegmentTree](crate::model::SegmentTree).

use crate::error::ErrorCategory;
use crate::model::{InvariantViolation, Tag};
use crate::parser::parsing_error::{ParsingError, ParsingErrorType};
use std::error::Error;
use std::fmt;

// =#========================================================================#=
// SWC ERROR TYPE
// =#========================================================================#=
/// What went wrong with an SWC input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SwcErrorType {
    /// A record could not be split into valid fields
    #[error("{0}")]
    MalformedRecord(ParsingErrorType),

    #[error("sample {id} has unsupported tag {tag}")]
    UnsupportedTag { id: i64, tag: Tag },

    #[error("duplicate sample id {0}")]
    DuplicateId(i64),

    #[error("sample {0} is its own parent")]
    SelfParent(i64),

    #[error("sample {id} has parent {parent}, which is listed after it")]
    ParentAfterChild { id: i64, parent: i64 },

    #[error("sample {id} has parent {parent}, which does not exist")]
    NoSuchParent { id: i64, parent: i64 },

    #[error("sample {other} is a second root (first root is sample {first})")]
    MultipleRoots { first: i64, other: i64 },

    #[error("sample {0} is the only sample, which cannot form a segment")]
    SingleSampleMorphology(i64),

    #[error("sample {0} has neither parent nor children")]
    IsolatedSample(i64),

    #[error("sample {0} is attached to the soma but has no children to form a segment")]
    SingleSampleBranch(i64),

    #[error("no soma sample in an empty morphology")]
    NoSoma,

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

impl SwcErrorType {
    /// The broad category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            SwcErrorType::MalformedRecord(ParsingErrorType::IoError(_)) => {
                ErrorCategory::FileNotFound
            }
            SwcErrorType::MalformedRecord(_)
            | SwcErrorType::UnsupportedTag { .. }
            | SwcErrorType::DuplicateId(_) => ErrorCategory::Parse,
            SwcErrorType::Invariant(_) => ErrorCategory::InvariantViolation,
            _ => ErrorCategory::InvalidTopology,
        }
    }
}

// =#========================================================================#=
// SWC ERROR
// =#========================================================================#=
/// An [SwcErrorType] plus the line (if known) and text it refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct SwcError {
    kind: SwcErrorType,
    line: Option<usize>,
    context: String,
}

impl SwcError {
    /// Creates an error not tied to a line of input.
    pub fn new(kind: SwcErrorType) -> Self {
        SwcError {
            kind,
            line: None,
            context: String::new(),
        }
    }

    /// Creates an error for line `line` (1-based, 0 meaning unknown).
    pub fn at_line(kind: SwcErrorType, line: usize, context: String) -> Self {
        SwcError {
            kind,
            line: (line > 0).then_some(line),
            context,
        }
    }

    pub fn kind(&self) -> &SwcErrorType {
        &self.kind
    }

    pub fn line(&self) -> Option<usize> {
        self.line
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    /// The broad category of this error.
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

impl fmt::Display for SwcError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if let Some(line) = self.line {
            write!(f, " on line {line}")?;
        }

        if !self.context.is_empty() {
            write!(f, "\n  Context: {}", self.context)?;
        }

        Ok(())
    }
}

impl Error for SwcError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            SwcErrorType::Invariant(violation) => Some(violation),
            _ => None,
        }
    }
}

impl From<ParsingError> for SwcError {
    fn from(err: ParsingError) -> Self {
        SwcError::at_line(
            SwcErrorType::MalformedRecord(err.kind().clone()),
            err.line(),
            err.context().to_string(),
        )
    }
}

impl From<InvariantViolation> for SwcError {
    fn from(violation: InvariantViolation) -> Self {
        SwcError::new(SwcErrorType::Invariant(violation))
    }
}

impl From<SwcErrorType> for SwcError {
    fn from(kind: SwcErrorType) -> Self {
        SwcError::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_line_and_context() {
        let err = SwcError::at_line(SwcErrorType::DuplicateId(4), 7, "4 3 0 0 0 1 3".to_string());
        assert_eq!(
            err.to_string(),
            "duplicate sample id 4 on line 7\n  Context: 4 3 0 0 0 1 3"
        );
        assert_eq!(err.category(), ErrorCategory::Parse);
    }

    #[test]
    fn test_categories() {
        assert_eq!(SwcError::new(SwcErrorType::NoSoma).category(), ErrorCategory::InvalidTopology);
        assert_eq!(
            SwcError::from(InvariantViolation::RootWithoutProximal).category(),
            ErrorCategory::InvariantViolation
        );
        assert_eq!(
            SwcError::new(SwcErrorType::MalformedRecord(ParsingErrorType::NegativeRadius(-1.0)))
                .category(),
            ErrorCategory::Parse
        );
    }
}
