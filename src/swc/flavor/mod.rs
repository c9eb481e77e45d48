//! Conventions for turning SWC samples into a [SegmentTree].
//!
//! SWC files describe samples, while a [SegmentTree] holds segments between
//! samples. Tools disagree on how the soma and the start of neurites are
//! meant to be read, so the mapping is chosen by an [SwcFlavor]:
//!
//! * [SwcFlavor::Arbor] - one segment per non-root sample, no special soma
//! * [SwcFlavor::Neuron] - like Arbor, but single-sample somas become
//!   cylinders, and forests and unordered files are accepted
//! * [SwcFlavor::Allen] - one soma sample at the origin, neurites attached to
//!   the ends of a soma cylinder, gaps at the attachment handled per [GapPolicy]

mod allen;
mod arbor;
mod neuron;

pub use allen::allen_segment_tree;
pub use arbor::as_segment_tree;
pub use neuron::neuron_segment_tree;

use crate::model::SegmentTree;
use crate::swc::parser::SwcMode;
use crate::swc::record::{SwcData, SwcRecord};
use crate::swc::swc_error::{SwcError, SwcErrorType};
use std::collections::HashMap;

/// How a neurite attached to the soma is joined to the soma cylinder in
/// [SwcFlavor::Allen].
///
/// Let `S` be a sample whose parent is the soma, and `E` the end of the soma
/// cylinder it attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GapPolicy {
    /// `S` forms no segment, its children start at `S`. The gap between `E`
    /// and `S` is kept.
    #[default]
    Preserve,

    /// `S` forms a segment from `E` (with the radius of `S`) to `S`.
    Bridge,

    /// `S` is moved onto `E`, so its children start at `E`.
    Snap,
}

impl GapPolicy {
    /// [GapPolicy::Bridge] if `no_gaps`, else [GapPolicy::Preserve].
    pub fn from_no_gaps(no_gaps: bool) -> Self {
        if no_gaps {
            GapPolicy::Bridge
        } else {
            GapPolicy::Preserve
        }
    }
}

/// Convention used to interpret SWC samples, see the [module](self) docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwcFlavor {
    #[default]
    Arbor,
    Neuron,
    Allen { gaps: GapPolicy },
}

impl SwcFlavor {
    /// The [SwcMode] the records of this flavor are parsed in.
    pub fn mode(&self) -> SwcMode {
        match self {
            SwcFlavor::Arbor => SwcMode::Strict,
            SwcFlavor::Neuron | SwcFlavor::Allen { .. } => SwcMode::Relaxed,
        }
    }

    /// Prefix of load error messages, e.g. `"NEURON SWC: "`.
    pub fn error_prefix(&self) -> &'static str {
        match self {
            SwcFlavor::Arbor => "",
            SwcFlavor::Neuron => "NEURON SWC: ",
            SwcFlavor::Allen { .. } => "Allen SWC: ",
        }
    }

    /// Converts validated `data` into a [SegmentTree].
    pub fn segment_tree(&self, data: &SwcData) -> Result<SegmentTree, SwcError> {
        let tree = match *self {
            SwcFlavor::Arbor => as_segment_tree(data)?,
            SwcFlavor::Neuron => neuron_segment_tree(data)?,
            SwcFlavor::Allen { gaps } => allen_segment_tree(data, gaps)?,
        };

        tracing::debug!(
            target: "swctree",
            "{:?}: {} records into {} segments ({} roots)",
            self,
            data.len(),
            tree.size(),
            tree.num_roots()
        );
        Ok(tree)
    }
}

/// Position of each record by sample id, and whether each record has children.
pub(crate) struct SampleIndex {
    positions: HashMap<i64, usize>,
    has_children: Vec<bool>,
}

impl SampleIndex {
    pub(crate) fn new(data: &SwcData) -> Self {
        let records = data.records();
        let positions: HashMap<i64, usize> =
            records.iter().enumerate().map(|(i, r)| (r.id, i)).collect();

        let mut has_children = vec![false; records.len()];
        for parent in records.iter().filter_map(|r| r.parent_id) {
            if let Some(&p) = positions.get(&parent) {
                has_children[p] = true;
            }
        }

        SampleIndex { positions, has_children }
    }

    /// Position of the parent of `record`, `None` for roots.
    pub(crate) fn parent(&self, record: &SwcRecord) -> Result<Option<usize>, SwcError> {
        match record.parent_id {
            None => Ok(None),
            Some(parent) => match self.positions.get(&parent) {
                Some(&p) => Ok(Some(p)),
                None => Err(SwcErrorType::NoSuchParent { id: record.id, parent }.into()),
            },
        }
    }

    pub(crate) fn has_children(&self, position: usize) -> bool {
        self.has_children[position]
    }
}
