use crate::model::{SegmentIndex, SegmentTree};
use crate::swc::flavor::SampleIndex;
use crate::swc::record::SwcData;
use crate::swc::swc_error::{SwcError, SwcErrorType};

/// Converts SWC samples into a [SegmentTree] without any special treatment
/// of the soma.
///
/// Every non-root sample yields one segment, from its parent sample to
/// itself, with the tag of the sample. Root samples yield no segment, so
/// segments starting at a root are root segments.
///
/// # Errors
/// * [SwcErrorType::SingleSampleMorphology] for a single sample
/// * [SwcErrorType::IsolatedSample] for a root without children
///
/// # Example
/// ```
/// use swctree::swc::{SwcMode, as_segment_tree, parse_str};
///
/// let data = parse_str("1 1 0 0 0 2 -1\n2 3 0 5 0 1 1\n3 3 0 9 0 1 2", SwcMode::Strict).unwrap();
/// let tree = as_segment_tree(&data).unwrap();
///
/// assert_eq!(tree.size(), 2);
/// assert_eq!(tree.parents(), &[None, Some(0)]);
/// assert_eq!(tree.segments()[0].prox.radius, 2.0);
/// ```
pub fn as_segment_tree(data: &SwcData) -> Result<SegmentTree, SwcError> {
    let records = data.records();
    match records {
        [] => return Ok(SegmentTree::new()),
        [single] => return Err(SwcErrorType::SingleSampleMorphology(single.id).into()),
        _ => {}
    }

    let index = SampleIndex::new(data);
    let mut tree = SegmentTree::with_capacity(records.len() - 1);

    // Segment ending at each record, None for roots
    let mut ends: Vec<Option<SegmentIndex>> = Vec::with_capacity(records.len());

    for (i, record) in records.iter().enumerate() {
        let end = match index.parent(record)? {
            None => {
                if !index.has_children(i) {
                    return Err(SwcErrorType::IsolatedSample(record.id).into());
                }
                None
            }
            Some(p) => {
                let prox = records[p].point();
                Some(tree.append(ends[p], prox, record.point(), record.tag)?)
            }
        };
        ends.push(end);
    }

    Ok(tree)
}
