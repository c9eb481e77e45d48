//! Provides the append-only [SegmentTree].
//!
//! A [SegmentTree] is the raw geometric description of a cell: a forest of
//! [Segment]s, each referring to its parent by index. It is built by
//! appending segments one by one and then handed to
//! [Morphology](crate::model::Morphology) for branch decomposition.

use crate::model::invariant::InvariantViolation;
use crate::model::primitives::{Point, Segment, Tag};
use std::fmt;

/// Index of a segment in a [SegmentTree] (arena).
pub type SegmentIndex = usize;

// =$========================================================================$=
// SEGMENT TREE
// =$========================================================================$=
/// An append-only forest of [Segment]s using the arena pattern.
///
/// Segments are stored in a contiguous vector together with a parallel
/// vector of parent indices. The index of a segment is its identity.
///
/// # Invariants
/// - `segments().len() == parents().len()`
/// - A segment's parent, if any, has a smaller index than the segment itself.
///   Forward and self references are rejected on append, which rules out
///   cycles structurally.
/// - A segment without parent starts a new root.
/// - Appending is the only mutation.
///
/// # Example
/// ```
/// use swctree::model::{Point, SegmentTree};
///
/// let mut tree = SegmentTree::new();
/// let soma = tree
///     .append(None, Point::new(0.0, 0.0, 0.0, 5.0), Point::new(0.0, 10.0, 0.0, 5.0), 1)
///     .unwrap();
/// let dend = tree.append_distal(Some(soma), Point::new(0.0, 30.0, 0.0, 1.0), 3).unwrap();
///
/// assert_eq!(tree.size(), 2);
/// assert_eq!(tree.parents(), &[None, Some(soma)]);
/// assert_eq!(tree.segments()[dend].prox, Point::new(0.0, 10.0, 0.0, 5.0));
/// assert!(tree.append(Some(7), Point::default(), Point::default(), 3).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "SegmentTreeRepr"))]
pub struct SegmentTree {
    /// Segments of this tree (arena pattern)
    segments: Vec<Segment>,

    /// Parent of each segment, `None` for roots
    parents: Vec<Option<SegmentIndex>>,
}

// ============================================================================
// New, Appending (pub)
// ============================================================================
impl SegmentTree {
    /// Creates a new, empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new, empty tree with space for `capacity` segments.
    pub fn with_capacity(capacity: usize) -> Self {
        SegmentTree {
            segments: Vec::with_capacity(capacity),
            parents: Vec::with_capacity(capacity),
        }
    }

    /// Reserves space for at least `additional` more segments.
    pub fn reserve(&mut self, additional: usize) {
        self.segments.reserve(additional);
        self.parents.reserve(additional);
    }

    /// Appends a segment, returning its index.
    ///
    /// # Arguments
    /// * `parent` - Index of an existing segment, or `None` to start a new root
    /// * `prox` - Proximal end point
    /// * `dist` - Distal end point
    /// * `tag` - Structure tag of the segment
    ///
    /// # Errors
    /// [InvariantViolation::InvalidSegmentParent] if `parent` is not an
    /// existing segment; the tree is left unchanged.
    pub fn append(
        &mut self,
        parent: Option<SegmentIndex>,
        prox: Point,
        dist: Point,
        tag: Tag,
    ) -> Result<SegmentIndex, InvariantViolation> {
        self.check_parent(parent)?;

        let index = self.segments.len();
        self.segments.push(Segment::new(prox, dist, tag));
        self.parents.push(parent);
        Ok(index)
    }

    /// Appends a segment whose proximal point is the distal point of its parent.
    ///
    /// # Errors
    /// * [InvariantViolation::RootWithoutProximal] if `parent` is `None`
    /// * [InvariantViolation::InvalidSegmentParent] if `parent` is not an
    ///   existing segment
    pub fn append_distal(
        &mut self,
        parent: Option<SegmentIndex>,
        dist: Point,
        tag: Tag,
    ) -> Result<SegmentIndex, InvariantViolation> {
        let parent_index = parent.ok_or(InvariantViolation::RootWithoutProximal)?;
        self.check_parent(parent)?;

        let prox = self.segments[parent_index].dist;
        self.append(parent, prox, dist, tag)
    }

    fn check_parent(&self, parent: Option<SegmentIndex>) -> Result<(), InvariantViolation> {
        match parent {
            Some(p) if p >= self.segments.len() => Err(InvariantViolation::InvalidSegmentParent {
                parent: p,
                size: self.segments.len(),
            }),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Getters / Accessors, Queries (pub)
// ============================================================================
impl SegmentTree {
    /// Returns the number of segments in the tree.
    pub fn size(&self) -> usize {
        self.segments.len()
    }

    /// Returns whether the tree has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the parent of each segment, `None` for roots.
    pub fn parents(&self) -> &[Option<SegmentIndex>] {
        &self.parents
    }

    /// Returns all segments in index order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the segment at `index`, or `None` if out of bounds.
    pub fn segment(&self, index: SegmentIndex) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// Returns the parent of the segment at `index`.
    ///
    /// # Returns
    /// * `None` if `index` is out of bounds
    /// * `Some(None)` if the segment is a root
    /// * `Some(Some(parent))` otherwise
    pub fn parent(&self, index: SegmentIndex) -> Option<Option<SegmentIndex>> {
        self.parents.get(index).copied()
    }

    /// Returns the indices of the children of the segment at `index`, in
    /// ascending order. Empty for out-of-bounds indices.
    pub fn children(&self, index: SegmentIndex) -> Vec<SegmentIndex> {
        if index >= self.parents.len() {
            return Vec::new();
        }
        // Children always come after their parent
        (index + 1..self.parents.len())
            .filter(|&i| self.parents[i] == Some(index))
            .collect()
    }

    /// Returns the number of children of each segment.
    pub fn child_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.size()];
        for parent in self.parents.iter().flatten() {
            counts[*parent] += 1;
        }
        counts
    }

    /// Returns whether the segment at `index` has no parent.
    pub fn is_root(&self, index: SegmentIndex) -> bool {
        self.parent(index) == Some(None)
    }

    /// Returns whether the segment at `index` has more than one child.
    pub fn is_fork(&self, index: SegmentIndex) -> bool {
        index < self.size() && self.children(index).len() > 1
    }

    /// Returns whether the segment at `index` has no children.
    pub fn is_terminal(&self, index: SegmentIndex) -> bool {
        index < self.size() && self.children(index).is_empty()
    }

    /// Returns the number of root segments.
    pub fn num_roots(&self) -> usize {
        self.parents.iter().filter(|p| p.is_none()).count()
    }
}

impl std::ops::Index<SegmentIndex> for SegmentTree {
    type Output = Segment;

    fn index(&self, index: SegmentIndex) -> &Self::Output {
        &self.segments[index]
    }
}

// ============================================================================
// Printing (pub)
// ============================================================================
/// One line per segment, e.g.
/// ```text
/// segment tree with 2 segments:
///   [0] parent -  tag 1 (point 0 0 0 5) -> (point 0 10 0 5)
///   [1] parent 0  tag 3 (point 0 10 0 5) -> (point 0 30 0 1)
/// ```
impl fmt::Display for SegmentTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "segment tree with {} segments:", self.size())?;
        for (i, (segment, parent)) in self.segments.iter().zip(&self.parents).enumerate() {
            let parent = match parent {
                Some(p) => p.to_string(),
                None => "-".to_string(),
            };
            write!(
                f,
                "\n  [{}] parent {:<2} tag {} {} -> {}",
                i, parent, segment.tag, segment.prox, segment.dist
            )?;
        }
        Ok(())
    }
}

// ============================================================================
// Deserializing
// ============================================================================
/// Unchecked shape of a serialized [SegmentTree]; converted by re-appending
/// every segment so the parent invariant holds.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct SegmentTreeRepr {
    segments: Vec<Segment>,
    parents: Vec<Option<SegmentIndex>>,
}

#[cfg(feature = "serde")]
impl TryFrom<SegmentTreeRepr> for SegmentTree {
    type Error = InvariantViolation;

    fn try_from(repr: SegmentTreeRepr) -> Result<Self, Self::Error> {
        if repr.segments.len() != repr.parents.len() {
            return Err(InvariantViolation::ParentsLengthMismatch {
                segments: repr.segments.len(),
                parents: repr.parents.len(),
            });
        }

        let mut tree = SegmentTree::with_capacity(repr.segments.len());
        for (segment, parent) in repr.segments.into_iter().zip(repr.parents) {
            tree.append(parent, segment.prox, segment.dist, segment.tag)?;
        }
        Ok(tree)
    }
}
