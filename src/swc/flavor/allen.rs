use crate::model::{Point, SegmentIndex, SegmentTree};
use crate::swc::defs::{APICAL_DENDRITE_TAG, AXON_TAG, BASAL_DENDRITE_TAG, SOMA_TAG};
use crate::swc::flavor::{GapPolicy, SampleIndex};
use crate::swc::record::SwcData;
use crate::swc::swc_error::{SwcError, SwcErrorType};

/// Where the children of a converted sample attach.
#[derive(Debug, Clone, Copy)]
enum Attachment {
    /// The sample is the soma
    Soma,
    /// The sample ends segment `.0`
    Segment(SegmentIndex),
    /// The sample forms no segment; children start at `prox`, below `parent`
    Detached {
        parent: Option<SegmentIndex>,
        prox: Point,
    },
}

/// Converts SWC samples into a [SegmentTree] following the AllenDB and
/// Sonata conventions.
///
/// * The first sample is the centre of the soma, and the only root.
///   Everything is translated so that it lies at the origin.
/// * The soma is a cylinder along the z axis from `(0, 0, -r)` to
///   `(0, 0, r)`, tag 1, stored as segment 0.
/// * All other samples are axon (2), apical (3) or basal dendrite (4).
/// * Axons and apical dendrites attach to the proximal end of the soma as
///   new roots, basal dendrites to its distal end as children of segment 0.
/// * Samples attached to the soma are joined to it according to `gaps`.
///
/// # Errors
/// * [SwcErrorType::NoSoma] for empty input
/// * [SwcErrorType::MultipleRoots] for more than one root
/// * [SwcErrorType::UnsupportedTag] for non-soma samples with other tags
/// * [SwcErrorType::SingleSampleBranch] for a sample attached to the soma
///   without children, unless `gaps` is [GapPolicy::Bridge]
///
/// # Example
/// ```
/// use swctree::model::Point;
/// use swctree::swc::{GapPolicy, SwcMode, allen_segment_tree, parse_str};
///
/// let input = "1 1 10 10 10 2 -1\n2 4 10 10 15 1 1\n3 4 10 10 20 1 2";
/// let data = parse_str(input, SwcMode::Relaxed).unwrap();
///
/// let tree = allen_segment_tree(&data, GapPolicy::Bridge).unwrap();
/// assert_eq!(tree.segments()[0].dist, Point::new(0.0, 0.0, 2.0, 2.0));
/// assert_eq!(tree.segments()[1].prox, Point::new(0.0, 0.0, 2.0, 1.0));
///
/// let tree = allen_segment_tree(&data, GapPolicy::Preserve).unwrap();
/// assert_eq!(tree.segments()[1].prox, Point::new(0.0, 0.0, 5.0, 1.0));
/// ```
pub fn allen_segment_tree(
    data: &SwcData,
    gaps: GapPolicy,
) -> Result<SegmentTree, SwcError> {
    let records = data.records();
    let soma = records.first().ok_or(SwcError::new(SwcErrorType::NoSoma))?;
    if let Some(other) = records[1..].iter().find(|r| r.is_root()) {
        return Err(SwcErrorType::MultipleRoots { first: soma.id, other: other.id }.into());
    }
    if soma.tag != SOMA_TAG {
        tracing::warn!(
            target: "swctree",
            "Allen SWC: root sample {} has tag {}, treated as soma",
            soma.id,
            soma.tag
        );
    }
    if let Some(other) = records[1..]
        .iter()
        .find(|r| !matches!(r.tag, AXON_TAG | APICAL_DENDRITE_TAG | BASAL_DENDRITE_TAG))
    {
        return Err(SwcErrorType::UnsupportedTag { id: other.id, tag: other.tag }.into());
    }

    let index = SampleIndex::new(data);
    let (cx, cy, cz, radius) = (soma.x, soma.y, soma.z, soma.r);

    let mut tree = SegmentTree::with_capacity(records.len());
    let soma_segment = tree.append(
        None,
        Point::new(0.0, 0.0, -radius, radius),
        Point::new(0.0, 0.0, radius, radius),
        SOMA_TAG,
    )?;

    let mut attachments: Vec<Attachment> = Vec::with_capacity(records.len());
    attachments.push(Attachment::Soma);

    for (i, record) in records.iter().enumerate().skip(1) {
        let p = index
            .parent(record)?
            .ok_or(SwcErrorType::MultipleRoots { first: soma.id, other: record.id })?;
        let parent = &records[p];
        if p != 0 && parent.tag != record.tag {
            tracing::warn!(
                target: "swctree",
                "Allen SWC: sample {} has tag {}, but its parent {} has tag {}",
                record.id,
                record.tag,
                parent.id,
                parent.tag
            );
        }

        let dist = record.point().translated(-cx, -cy, -cz);
        let attachment = match attachments[p] {
            Attachment::Soma => {
                let (parent, z) = if record.tag == BASAL_DENDRITE_TAG {
                    (Some(soma_segment), radius)
                } else {
                    (None, -radius)
                };
                let end = Point::new(0.0, 0.0, z, record.r);

                match gaps {
                    GapPolicy::Bridge => {
                        Attachment::Segment(tree.append(parent, end, dist, record.tag)?)
                    }
                    GapPolicy::Preserve | GapPolicy::Snap => {
                        if !index.has_children(i) {
                            return Err(SwcErrorType::SingleSampleBranch(record.id).into());
                        }
                        let prox = if gaps == GapPolicy::Snap { end } else { dist };
                        Attachment::Detached { parent, prox }
                    }
                }
            }
            Attachment::Detached { parent, prox } => {
                Attachment::Segment(tree.append(parent, prox, dist, record.tag)?)
            }
            Attachment::Segment(segment) => {
                Attachment::Segment(tree.append_distal(Some(segment), dist, record.tag)?)
            }
        };
        attachments.push(attachment);
    }

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swc::parse_str;
    use crate::swc::parser::SwcMode;

    const CELL: &str = "\
1 1 100 50 0 5 -1
2 2 100 40 0 1 1
3 2 100 30 0 1 2
4 3 100 60 0 2 1
5 3 100 70 0 2 4
6 4 110 50 0 1 1
7 4 120 50 0 1 6
";

    fn tree(input: &str, gaps: GapPolicy) -> Result<SegmentTree, SwcError> {
        allen_segment_tree(&parse_str(input, SwcMode::Relaxed)?, gaps)
    }

    #[test]
    fn test_soma_at_origin_along_z() {
        let tree = tree(CELL, GapPolicy::Preserve).unwrap();
        let soma = tree.segments()[0];
        assert_eq!(soma.prox, Point::new(0.0, 0.0, -5.0, 5.0));
        assert_eq!(soma.dist, Point::new(0.0, 0.0, 5.0, 5.0));
        assert_eq!(soma.tag, SOMA_TAG);
        assert!(tree.is_root(0));
    }

    #[test]
    fn test_preserve_keeps_offset() {
        let tree = tree(CELL, GapPolicy::Preserve).unwrap();
        assert_eq!(tree.size(), 4);

        // axon: 2 -> 3, root at the proximal end
        assert_eq!(tree.parents()[1], None);
        assert_eq!(tree.segments()[1].prox, Point::new(0.0, -10.0, 0.0, 1.0));
        // basal: 6 -> 7, below the soma
        assert_eq!(tree.parents()[3], Some(0));
        assert_eq!(tree.segments()[3].prox, Point::new(10.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_bridge_closes_gaps() {
        let tree = tree(CELL, GapPolicy::Bridge).unwrap();
        assert_eq!(tree.size(), 7);
        assert_eq!(tree.segments()[1].prox, Point::new(0.0, 0.0, -5.0, 1.0));
        assert_eq!(tree.segments()[1].dist, Point::new(0.0, -10.0, 0.0, 1.0));
        assert_eq!(tree.parents()[2], Some(1));
        assert_eq!(tree.segments()[5].prox, Point::new(0.0, 0.0, 5.0, 1.0));
        assert_eq!(tree.parents()[5], Some(0));
    }

    #[test]
    fn test_snap_moves_first_sample() {
        let tree = tree(CELL, GapPolicy::Snap).unwrap();
        assert_eq!(tree.size(), 4);
        assert_eq!(tree.segments()[2].prox, Point::new(0.0, 0.0, -5.0, 2.0));
        assert_eq!(tree.segments()[2].dist, Point::new(0.0, 20.0, 0.0, 2.0));
    }

    #[test]
    fn test_root_tag_forced_to_soma() {
        let input = "1 3 0 0 0 1 -1\n2 3 0 1 0 1 1\n3 3 0 2 0 1 2";
        let tree = tree(input, GapPolicy::Preserve).unwrap();
        assert_eq!(tree.segments()[0].tag, SOMA_TAG);
    }

    #[test]
    fn test_errors() {
        let kind = |input: &str, gaps| tree(input, gaps).unwrap_err().kind().clone();

        assert_eq!(kind("", GapPolicy::Bridge), SwcErrorType::NoSoma);
        assert_eq!(
            kind("1 1 0 0 0 1 -1\n2 2 0 1 0 1 -1", GapPolicy::Bridge),
            SwcErrorType::MultipleRoots { first: 1, other: 2 }
        );
        assert_eq!(
            kind("1 1 0 0 0 1 -1\n2 7 0 1 0 1 1", GapPolicy::Bridge),
            SwcErrorType::UnsupportedTag { id: 2, tag: 7 }
        );
        assert_eq!(
            kind("1 1 0 0 0 1 -1\n2 2 0 1 0 1 1", GapPolicy::Preserve),
            SwcErrorType::SingleSampleBranch(2)
        );
        assert!(tree("1 1 0 0 0 1 -1\n2 2 0 1 0 1 1", GapPolicy::Bridge).is_ok());
    }

    #[test]
    fn test_only_soma() {
        let tree = tree("1 1 3 3 3 2 -1", GapPolicy::Preserve).unwrap();
        assert_eq!(tree.size(), 1);
    }
}
