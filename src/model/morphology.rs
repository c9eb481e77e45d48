//! Provides [Morphology], the branch decomposition of a [SegmentTree].
//!
//! # Branches
//! A branch is a maximal unbranched run of segments. Walking the segments in
//! index order, a segment starts a new branch if
//! - it is a root (several roots meet at an implicit common point), or
//! - its parent has more than one child (the parent is a fork).
//!
//! Otherwise the segment continues the branch of its parent. Since parents
//! always precede their children, a single pass over the segments suffices,
//! and branches are numbered in order of their first segment.

use crate::model::invariant::InvariantViolation;
use crate::model::primitives::{Cable, Location, Segment};
use crate::model::segment_tree::{SegmentIndex, SegmentTree};
use std::fmt;

/// Index of a branch in a [Morphology].
pub type BranchIndex = usize;

// =$========================================================================$=
// MORPHOLOGY
// =$========================================================================$=
/// Read-only decomposition of a [SegmentTree] into branches.
///
/// A [Morphology] owns the segments and parents of the tree it was built
/// from and exposes no mutators.
///
/// # Example
/// ```
/// use swctree::model::{Morphology, Point, SegmentTree};
///
/// // A "Y": one stem segment, forking into two
/// let mut tree = SegmentTree::new();
/// let stem = tree
///     .append(None, Point::new(0.0, 0.0, 0.0, 1.0), Point::new(0.0, 1.0, 0.0, 1.0), 3)
///     .unwrap();
/// tree.append_distal(Some(stem), Point::new(-1.0, 2.0, 0.0, 1.0), 3).unwrap();
/// tree.append_distal(Some(stem), Point::new(1.0, 2.0, 0.0, 1.0), 3).unwrap();
///
/// let morph = Morphology::new(tree);
/// assert_eq!(morph.num_branches(), 3);
/// assert_eq!(morph.branch_parent(0).unwrap(), None);
/// assert_eq!(morph.branch_children(0).unwrap(), &[1, 2]);
/// assert_eq!(morph.branch_segments(2).unwrap(), &[2]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Morphology {
    /// Segments of the source tree
    segments: Vec<Segment>,

    /// Parents of the segments of the source tree
    segment_parents: Vec<Option<SegmentIndex>>,

    /// Branch of each segment
    segment_branches: Vec<BranchIndex>,

    /// Segments of each branch, proximal to distal
    branches: Vec<Vec<SegmentIndex>>,

    /// Parent of each branch, `None` for root branches
    branch_parents: Vec<Option<BranchIndex>>,

    /// Children of each branch, ascending
    branch_children: Vec<Vec<BranchIndex>>,
}

// ============================================================================
// Construction (pub)
// ============================================================================
impl Morphology {
    /// Builds the branch decomposition of `tree`.
    pub fn new(tree: SegmentTree) -> Self {
        let child_counts = tree.child_counts();
        let parents = tree.parents();

        let mut segment_branches: Vec<BranchIndex> = Vec::with_capacity(tree.size());
        let mut branches: Vec<Vec<SegmentIndex>> = Vec::new();
        let mut branch_parents = Vec::new();

        for (index, parent) in parents.iter().enumerate() {
            let branch = match *parent {
                Some(p) if child_counts[p] == 1 => {
                    // Continue the parent's branch
                    let branch = segment_branches[p];
                    branches[branch].push(index);
                    branch
                }
                _ => {
                    let branch = branches.len();
                    branches.push(vec![index]);
                    branch_parents.push(parent.map(|p| segment_branches[p]));
                    branch
                }
            };
            segment_branches.push(branch);
        }

        let mut branch_children = vec![Vec::new(); branches.len()];
        for (branch, parent) in branch_parents.iter().enumerate() {
            if let Some(p) = parent {
                branch_children[*p].push(branch);
            }
        }

        tracing::debug!(
            target: "swctree",
            "morphology: {} segments in {} branches",
            tree.size(),
            branches.len()
        );

        Morphology {
            segments: tree.segments().to_vec(),
            segment_parents: parents.to_vec(),
            segment_branches,
            branches,
            branch_parents,
            branch_children,
        }
    }
}

impl From<SegmentTree> for Morphology {
    fn from(tree: SegmentTree) -> Self {
        Morphology::new(tree)
    }
}

// ============================================================================
// Getters / Accessors (pub)
// ============================================================================
impl Morphology {
    /// Returns whether the morphology has no branches.
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Returns the number of branches.
    pub fn num_branches(&self) -> usize {
        self.branches.len()
    }

    /// Returns the parent of branch `branch`, or `None` for a root branch.
    ///
    /// # Errors
    /// [InvariantViolation::BranchOutOfBounds] for an invalid branch index.
    pub fn branch_parent(
        &self,
        branch: BranchIndex,
    ) -> Result<Option<BranchIndex>, InvariantViolation> {
        self.check_branch(branch)?;
        Ok(self.branch_parents[branch])
    }

    /// Returns the children of branch `branch` in ascending order.
    ///
    /// # Errors
    /// [InvariantViolation::BranchOutOfBounds] for an invalid branch index.
    pub fn branch_children(
        &self,
        branch: BranchIndex,
    ) -> Result<&[BranchIndex], InvariantViolation> {
        self.check_branch(branch)?;
        Ok(&self.branch_children[branch])
    }

    /// Returns the segments of branch `branch`, ordered from its proximal
    /// to its distal end.
    ///
    /// # Errors
    /// [InvariantViolation::BranchOutOfBounds] for an invalid branch index.
    pub fn branch_segments(
        &self,
        branch: BranchIndex,
    ) -> Result<&[SegmentIndex], InvariantViolation> {
        self.check_branch(branch)?;
        Ok(&self.branches[branch])
    }

    /// Returns the total length of the segments of branch `branch`.
    ///
    /// # Errors
    /// [InvariantViolation::BranchOutOfBounds] for an invalid branch index.
    pub fn branch_length(&self, branch: BranchIndex) -> Result<f64, InvariantViolation> {
        Ok(self
            .branch_segments(branch)?
            .iter()
            .map(|&s| self.segments[s].length())
            .sum())
    }

    /// Returns the branch holding segment `segment`.
    ///
    /// # Errors
    /// [InvariantViolation::SegmentOutOfBounds] for an invalid segment index.
    pub fn segment_branch(&self, segment: SegmentIndex) -> Result<BranchIndex, InvariantViolation> {
        self.segment_branches
            .get(segment)
            .copied()
            .ok_or(InvariantViolation::SegmentOutOfBounds {
                segment,
                size: self.segments.len(),
            })
    }

    /// Returns the branches without parent, ascending.
    pub fn root_branches(&self) -> Vec<BranchIndex> {
        (0..self.num_branches())
            .filter(|&b| self.branch_parents[b].is_none())
            .collect()
    }

    /// Returns the branches without children, ascending.
    pub fn terminal_branches(&self) -> Vec<BranchIndex> {
        (0..self.num_branches())
            .filter(|&b| self.branch_children[b].is_empty())
            .collect()
    }

    /// Returns the segments of the source tree.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the segment parents of the source tree.
    pub fn segment_parents(&self) -> &[Option<SegmentIndex>] {
        &self.segment_parents
    }

    /// Checks that the branch of `location` exists in this morphology.
    pub fn validate_location(&self, location: &Location) -> Result<(), InvariantViolation> {
        self.check_branch(location.branch())
    }

    /// Checks that the branch of `cable` exists in this morphology.
    pub fn validate_cable(&self, cable: &Cable) -> Result<(), InvariantViolation> {
        self.check_branch(cable.branch())
    }

    fn check_branch(&self, branch: BranchIndex) -> Result<(), InvariantViolation> {
        if branch >= self.branches.len() {
            return Err(InvariantViolation::BranchOutOfBounds {
                branch,
                num_branches: self.branches.len(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Printing (pub)
// ============================================================================
impl fmt::Display for Morphology {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "morphology with {} branches:", self.num_branches())?;
        for (b, segments) in self.branches.iter().enumerate() {
            let parent = match self.branch_parents[b] {
                Some(p) => p.to_string(),
                None => "-".to_string(),
            };
            write!(
                f,
                "\n  [{}] parent {:<2} children {:?} segments {:?}",
                b, parent, self.branch_children[b], segments
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Point;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y, 0.0, 1.0)
    }

    #[test]
    fn test_unbranched_chain_is_single_branch() {
        let mut tree = SegmentTree::new();
        let mut last = tree.append(None, p(0.0, 0.0), p(0.0, 1.0), 3).unwrap();
        for i in 2..6 {
            last = tree.append_distal(Some(last), p(0.0, i as f64), 3).unwrap();
        }

        let morph = Morphology::new(tree);
        assert_eq!(morph.num_branches(), 1);
        assert_eq!(morph.branch_segments(0).unwrap(), &[0, 1, 2, 3, 4]);
        assert_eq!(morph.terminal_branches(), vec![0]);
        assert_eq!(morph.branch_length(0).unwrap(), 5.0);
    }

    #[test]
    fn test_empty_tree() {
        let morph = Morphology::new(SegmentTree::new());
        assert!(morph.is_empty());
        assert!(morph.branch_parent(0).is_err());
    }

    #[test]
    fn test_segment_branch_lookup() {
        let mut tree = SegmentTree::new();
        let a = tree.append(None, p(0.0, 0.0), p(0.0, 1.0), 3).unwrap();
        tree.append_distal(Some(a), p(1.0, 2.0), 3).unwrap();
        tree.append_distal(Some(a), p(-1.0, 2.0), 3).unwrap();

        let morph = Morphology::new(tree);
        assert_eq!(morph.segment_branch(2).unwrap(), 2);
        assert!(morph.segment_branch(3).is_err());
    }
}
