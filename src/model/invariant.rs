//! Errors raised when a call would break an invariant of the model types.

use crate::model::{BranchIndex, SegmentIndex};

/// Violation of an invariant of [SegmentTree](crate::model::SegmentTree),
/// [Morphology](crate::model::Morphology), [Location](crate::model::Location)
/// or [Cable](crate::model::Cable).
///
/// Raised by the call that would have broken the invariant; the value the
/// call operated on is left unchanged. Values are never clamped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("invalid parent segment {parent} for a tree of size {size}")]
    InvalidSegmentParent { parent: SegmentIndex, size: usize },

    #[error("{segments} segments but {parents} parents")]
    ParentsLengthMismatch { segments: usize, parents: usize },

    #[error("a root segment has no parent to take its proximal point from")]
    RootWithoutProximal,

    #[error("invalid location (location {branch} {pos}): position must lie in [0, 1]")]
    InvalidLocation { branch: BranchIndex, pos: f64 },

    #[error(
        "invalid cable (cable {branch} {prox} {dist}): \
         proximal and distal positions must lie in [0, 1]"
    )]
    InvalidCable {
        branch: BranchIndex,
        prox: f64,
        dist: f64,
    },

    #[error("branch {branch} out of bounds for a morphology with {num_branches} branches")]
    BranchOutOfBounds {
        branch: BranchIndex,
        num_branches: usize,
    },

    #[error("segment {segment} out of bounds for {size} segments")]
    SegmentOutOfBounds { segment: SegmentIndex, size: usize },
}
