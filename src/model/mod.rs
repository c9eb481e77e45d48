//! Data model for neuron cable morphologies.
//!
//! # Representation
//! Geometry is described by a [SegmentTree], an append-only forest of
//! [Segment]s in which every segment refers to its parent by
//! [SegmentIndex]. Parents always precede their children.
//!
//! A [Morphology] partitions the segments of a tree into branches,
//! referenced by [BranchIndex], and records how branches connect.
//!
//! Positions on a morphology are given by [Location] (a point on a branch)
//! and [Cable] (an interval of a branch), both relative to the branch length.
//!
//! Both [SegmentTree] and [Morphology] use the arena pattern: entities
//! are only referenced by their dense index.

pub mod invariant;
pub mod morphology;
pub mod primitives;
pub mod segment_tree;

pub use invariant::InvariantViolation;
pub use morphology::{BranchIndex, Morphology};
pub use primitives::{Cable, Location, Point, Segment, Tag};
pub use segment_tree::{SegmentIndex, SegmentTree};
