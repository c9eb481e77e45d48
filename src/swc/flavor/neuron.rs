use crate::model::{SegmentIndex, SegmentTree};
use crate::swc::defs::SOMA_TAG;
use crate::swc::flavor::SampleIndex;
use crate::swc::record::SwcData;
use crate::swc::swc_error::{SwcError, SwcErrorType};

/// Converts SWC samples into a [SegmentTree] the way NEURON reads them.
///
/// Differences to [as_segment_tree](super::as_segment_tree):
/// * A root soma sample without soma children is a single-sample soma. It
///   becomes a cylinder along the y axis, of length and diameter `2r`,
///   stored as two segments meeting at the sample. Its children attach to
///   the centre, i.e. to the first of the two segments.
/// * Segments leaving a soma sample without being soma themselves start
///   with their own radius.
/// * Forests are accepted, a root soma sample may be on its own.
///
/// # Errors
/// [SwcErrorType::IsolatedSample] for a root without children that is not
/// a soma.
///
/// # Example
/// ```
/// use swctree::model::Point;
/// use swctree::swc::{SwcMode, neuron_segment_tree, parse_str};
///
/// let data = parse_str("1 1 0 0 0 4 -1\n2 3 0 0 10 1 1", SwcMode::Relaxed).unwrap();
/// let tree = neuron_segment_tree(&data).unwrap();
///
/// assert_eq!(tree.size(), 3);
/// assert_eq!(tree.parents(), &[None, Some(0), Some(0)]);
/// assert_eq!(tree.segments()[0].prox, Point::new(0.0, -4.0, 0.0, 4.0));
/// assert_eq!(tree.segments()[2].prox, Point::new(0.0, 0.0, 0.0, 1.0));
/// ```
pub fn neuron_segment_tree(data: &SwcData) -> Result<SegmentTree, SwcError> {
    let records = data.records();
    let index = SampleIndex::new(data);

    // Soma samples with a soma child form the soma from regular segments
    let mut has_soma_child = vec![false; records.len()];
    for record in records.iter().filter(|r| r.tag == SOMA_TAG) {
        if let Some(p) = index.parent(record)? {
            has_soma_child[p] = true;
        }
    }

    let mut tree = SegmentTree::with_capacity(records.len() + 1);

    // Segment children of each record attach to, None for roots
    let mut ends: Vec<Option<SegmentIndex>> = Vec::with_capacity(records.len());

    for (i, record) in records.iter().enumerate() {
        let end = match index.parent(record)? {
            None if record.tag == SOMA_TAG && !has_soma_child[i] => {
                let centre = record.point();
                let first = tree.append(
                    None,
                    centre.translated(0.0, -record.r, 0.0),
                    centre,
                    SOMA_TAG,
                )?;
                tree.append_distal(Some(first), centre.translated(0.0, record.r, 0.0), SOMA_TAG)?;
                tracing::trace!(target: "swctree", "sample {} is a single-sample soma", record.id);
                Some(first)
            }
            None => {
                if !index.has_children(i) {
                    return Err(SwcErrorType::IsolatedSample(record.id).into());
                }
                None
            }
            Some(p) => {
                let parent = &records[p];
                let prox = if parent.tag == SOMA_TAG && record.tag != SOMA_TAG {
                    parent.point().with_radius(record.r)
                } else {
                    parent.point()
                };
                Some(tree.append(ends[p], prox, record.point(), record.tag)?)
            }
        };
        ends.push(end);
    }

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Point;
    use crate::swc::parse_str;
    use crate::swc::parser::SwcMode;

    fn tree(input: &str) -> Result<SegmentTree, SwcError> {
        neuron_segment_tree(&parse_str(input, SwcMode::Relaxed)?)
    }

    #[test]
    fn test_lone_soma_becomes_cylinder() {
        let tree = tree("1 1 2 3 4 5 -1").unwrap();
        assert_eq!(tree.size(), 2);
        assert_eq!(tree.segments()[0].prox, Point::new(2.0, -2.0, 4.0, 5.0));
        assert_eq!(tree.segments()[1].dist, Point::new(2.0, 8.0, 4.0, 5.0));
        assert_eq!(tree.segments()[0].length() + tree.segments()[1].length(), 10.0);
    }

    #[test]
    fn test_multi_sample_soma_is_not_expanded() {
        let tree = tree("1 1 0 0 0 3 -1\n2 1 0 2 0 3 1\n3 3 0 5 0 1 2").unwrap();
        assert_eq!(tree.size(), 2);
        assert_eq!(tree.segments()[0].tag, 1);
        // dendrite leaving the soma starts with its own radius
        assert_eq!(tree.segments()[1].prox, Point::new(0.0, 2.0, 0.0, 1.0));
    }

    #[test]
    fn test_unordered_forest() {
        let tree = tree("4 3 0 1 0 1 3\n3 3 0 0 0 1 -1\n1 1 0 0 0 1 -1").unwrap();
        assert_eq!(tree.num_roots(), 2);
        assert_eq!(tree.size(), 3);
    }

    #[test]
    fn test_isolated_non_soma_root() {
        assert_eq!(
            *tree("1 1 0 0 0 1 -1\n7 3 0 0 0 1 -1").unwrap_err().kind(),
            SwcErrorType::IsolatedSample(7)
        );
    }
}
