//! Errors of the load API: [LoadError] and its [ErrorCategory].

use crate::swc::{SwcError, SwcFlavor};
use std::path::PathBuf;

/// Broad classification of load errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The input could not be opened or read
    FileNotFound,
    /// A record is malformed, or a tag is not allowed
    Parse,
    /// The samples do not form a valid tree for the flavor
    InvalidTopology,
    /// A segment tree or morphology was used inconsistently
    InvariantViolation,
}

/// Error from loading an SWC file, naming the file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("can't open file '{}'", .path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}error parsing {}: {}", .flavor.error_prefix(), .path.display(), .source)]
    Swc {
        path: PathBuf,
        flavor: SwcFlavor,
        #[source]
        source: SwcError,
    },
}

impl LoadError {
    /// The broad category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            LoadError::FileNotFound { .. } => ErrorCategory::FileNotFound,
            LoadError::Swc { source, .. } => source.category(),
        }
    }

    /// The underlying [SwcError], unless the file could not be opened.
    pub fn swc_error(&self) -> Option<&SwcError> {
        match self {
            LoadError::FileNotFound { .. } => None,
            LoadError::Swc { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swc::{GapPolicy, SwcErrorType};

    #[test]
    fn test_flavor_prefix() {
        let err = LoadError::Swc {
            path: PathBuf::from("cell.swc"),
            flavor: SwcFlavor::Allen { gaps: GapPolicy::Preserve },
            source: SwcError::new(SwcErrorType::NoSoma),
        };
        assert_eq!(
            err.to_string(),
            "Allen SWC: error parsing cell.swc: no soma sample in an empty morphology"
        );
        assert_eq!(err.category(), ErrorCategory::InvalidTopology);
    }
}
